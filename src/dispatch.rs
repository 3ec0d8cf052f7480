//! Mode dispatch: the two entry points the surrounding UI (or CLI) calls.
//!
//! Both return a positional `(preview markdown, raw output, visualization
//! HTML)` triple — callers destructure by position, so the order is part of
//! the contract.
//!
//! * [`parse_document`] — full-page layout parsing; all three outputs come
//!   from the reconstructor.
//! * [`recognize_element`] — targeted single-element recognition; no page
//!   visualization by contract, except the spotting task which replaces the
//!   raw output with the pruned spotting JSON and builds its visualization
//!   from a dedicated response image.

use crate::config::Settings;
use crate::error::DocLensError;
use crate::pipeline::client::submit;
use crate::pipeline::payload::{encode, PayloadOptions};
use crate::pipeline::reconstruct::{reconstruct, resolve_image_ref, NO_VIS_STYLED_HTML};
use crate::response::PageResult;
use serde_json::Value;
use tracing::info;

/// Toggles for full-page document parsing.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Run chart-to-table recognition on detected chart regions.
    pub use_chart_recognition: bool,
    pub use_doc_unwarping: bool,
    pub use_doc_orientation_classify: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            use_chart_recognition: false,
            use_doc_unwarping: true,
            use_doc_orientation_classify: true,
        }
    }
}

/// Targeted-recognition element types, mapping one-to-one onto the
/// service's prompt labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecognitionTask {
    #[default]
    Ocr,
    Formula,
    Table,
    Chart,
    Spotting,
    Seal,
}

impl RecognitionTask {
    /// Map a user-facing selection — display name or raw label — onto a
    /// task. Unknown input falls back to [`RecognitionTask::Ocr`].
    pub fn from_choice(choice: &str) -> Self {
        match choice {
            "Text Recognition" | "ocr" => Self::Ocr,
            "Formula Recognition" | "formula" => Self::Formula,
            "Table Recognition" | "table" => Self::Table,
            "Chart Recognition" | "chart" => Self::Chart,
            "Spotting" | "spotting" => Self::Spotting,
            "Seal Recognition" | "seal" => Self::Seal,
            _ => Self::Ocr,
        }
    }

    /// The service-side tag selecting which recognition model runs.
    pub fn prompt_label(&self) -> &'static str {
        match self {
            Self::Ocr => "ocr",
            Self::Formula => "formula",
            Self::Table => "table",
            Self::Chart => "chart",
            Self::Spotting => "spotting",
            Self::Seal => "seal",
        }
    }
}

/// Parse a full document (layout detection on).
///
/// Returns `(preview markdown, raw markdown, visualization HTML)`.
pub async fn parse_document(
    input_ref: &str,
    opts: &ParseOptions,
    settings: &Settings,
) -> Result<(String, String, String), DocLensError> {
    if input_ref.is_empty() {
        return Err(DocLensError::MissingInput);
    }
    info!("Document parsing: {}", input_ref);

    let payload = encode(
        input_ref,
        &PayloadOptions {
            use_layout_detection: true,
            prompt_label: None,
            use_chart_recognition: opts.use_chart_recognition,
            use_doc_unwarping: opts.use_doc_unwarping,
            use_doc_orientation_classify: opts.use_doc_orientation_classify,
            embed_remote: false,
        },
        settings,
    )
    .await?;

    let envelope = submit(&payload, settings).await?;
    let (preview, vis_html, raw) = reconstruct(&envelope.result);
    Ok((preview, raw, vis_html))
}

/// Recognise a single element (layout detection off).
///
/// Returns `(preview markdown, raw output, visualization HTML)`. For every
/// task but spotting the visualization is a fixed placeholder; spotting
/// swaps the raw output for the pruned spotting JSON and renders the
/// annotated image the service returns for it.
pub async fn recognize_element(
    input_ref: &str,
    task: RecognitionTask,
    settings: &Settings,
) -> Result<(String, String, String), DocLensError> {
    if input_ref.is_empty() {
        return Err(DocLensError::MissingInput);
    }
    info!("Targeted recognition ({}): {}", task.prompt_label(), input_ref);

    let payload = encode(
        input_ref,
        &PayloadOptions {
            use_layout_detection: false,
            prompt_label: Some(task.prompt_label().to_string()),
            use_chart_recognition: false,
            use_doc_unwarping: false,
            use_doc_orientation_classify: false,
            embed_remote: false,
        },
        settings,
    )
    .await?;

    let envelope = submit(&payload, settings).await?;
    let (preview, _, mut raw) = reconstruct(&envelope.result);
    let mut vis_html = NO_VIS_STYLED_HTML.to_string();

    if task == RecognitionTask::Spotting {
        let page0 = envelope
            .result
            .layout_parsing_results
            .first()
            .and_then(|p| p.as_ref());
        raw = spotting_json(page0);
        if let Some(img_html) = spotting_visualization(page0) {
            vis_html = img_html;
        }
    }

    Ok((preview, raw, vis_html))
}

/// Pretty-printed `prunedResult.spotting_res` of the first page, or `{}`.
fn spotting_json(page: Option<&PageResult>) -> String {
    let spotting = page
        .and_then(|p| p.pruned_result.get("spotting_res"))
        .filter(|v| !v.is_null())
        .cloned()
        .unwrap_or_else(|| Value::Object(Default::default()));
    serde_json::to_string_pretty(&spotting).unwrap_or_else(|_| "{}".to_string())
}

/// The annotated spotting image, when the first page carries one.
fn spotting_visualization(page: Option<&PageResult>) -> Option<String> {
    let img_data = page?
        .output_images
        .get("spotting_res_img")?
        .as_str()
        .filter(|s| !s.is_empty())?;
    let src = resolve_image_ref(img_data);
    Some(format!(
        "<img src=\"{src}\" alt=\"Spotting Visualization\" loading=\"lazy\">"
    ))
}
