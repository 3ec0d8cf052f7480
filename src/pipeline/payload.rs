//! Payload assembly: one wire payload from heterogeneous input.
//!
//! The service accepts `file` in two forms: a URL it fetches itself, or
//! base64-encoded content with an explicit `fileType`. Local paths are
//! always embedded; URLs pass through untouched unless the caller asks for
//! [`PayloadOptions::embed_remote`], in which case the bytes are fetched
//! here (bounded by the download timeout) and embedded like a local file.
//!
//! Validation happens before any I/O: an empty reference or a missing
//! element label for targeted recognition never reaches the network.

use crate::config::Settings;
use crate::error::DocLensError;
use crate::pipeline::input;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

/// `fileType` tag for PDF content.
pub const FILE_TYPE_PDF: u8 = 0;
/// `fileType` tag for image content.
pub const FILE_TYPE_IMAGE: u8 = 1;

/// The JSON body POSTed to the recognition service.
///
/// `fileType` is present iff `file` carries base64 content; `promptLabel`
/// is present iff layout detection is off; `useChartRecognition` is only
/// serialised when layout detection is on and the flag is set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPayload {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<u8>,
    pub use_layout_detection: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_label: Option<String>,
    pub use_doc_unwarping: bool,
    pub use_doc_orientation_classify: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_chart_recognition: Option<bool>,
}

/// Per-mode parameters for [`encode`].
#[derive(Debug, Clone)]
pub struct PayloadOptions {
    /// Full-page layout parsing (true) vs. targeted element recognition.
    pub use_layout_detection: bool,
    /// Element-type tag, required when `use_layout_detection` is false.
    /// Trimmed and lower-cased before it goes on the wire.
    pub prompt_label: Option<String>,
    /// Run chart-to-table recognition (layout detection only).
    pub use_chart_recognition: bool,
    pub use_doc_unwarping: bool,
    pub use_doc_orientation_classify: bool,
    /// Fetch URL inputs and embed them as base64 instead of passing the URL
    /// through for the service to fetch.
    pub embed_remote: bool,
}

impl Default for PayloadOptions {
    fn default() -> Self {
        Self {
            use_layout_detection: true,
            prompt_label: None,
            use_chart_recognition: false,
            use_doc_unwarping: true,
            use_doc_orientation_classify: true,
            embed_remote: false,
        }
    }
}

/// Build the request payload for an input reference.
///
/// # Errors
/// * [`DocLensError::MissingInput`] — `input_ref` is empty.
/// * [`DocLensError::MissingPromptLabel`] — targeted recognition without a
///   label (or a label that trims to nothing).
/// * [`DocLensError::FileRead`] / [`DocLensError::DownloadFailed`] /
///   [`DocLensError::DownloadTimeout`] — the referenced bytes could not be
///   read.
pub async fn encode(
    input_ref: &str,
    opts: &PayloadOptions,
    settings: &Settings,
) -> Result<RequestPayload, DocLensError> {
    if input_ref.is_empty() {
        return Err(DocLensError::MissingInput);
    }

    let prompt_label = if opts.use_layout_detection {
        None
    } else {
        let label = opts.prompt_label.as_deref().map(str::trim).unwrap_or("");
        if label.is_empty() {
            return Err(DocLensError::MissingPromptLabel);
        }
        Some(label.to_lowercase())
    };

    let (file, file_type) = if input::is_url(input_ref) {
        if opts.embed_remote {
            let bytes = input::fetch_remote(input_ref, settings.download_timeout_secs).await?;
            let ext = input::url_path_extension(input_ref);
            (STANDARD.encode(&bytes), Some(file_type_for(&ext)))
        } else {
            (input_ref.to_string(), None)
        }
    } else {
        let bytes = input::read_local(input_ref).await?;
        let ext = input::file_extension(input_ref);
        (STANDARD.encode(&bytes), Some(file_type_for(&ext)))
    };

    Ok(RequestPayload {
        file,
        file_type,
        use_layout_detection: opts.use_layout_detection,
        prompt_label,
        use_doc_unwarping: opts.use_doc_unwarping,
        use_doc_orientation_classify: opts.use_doc_orientation_classify,
        use_chart_recognition: (opts.use_layout_detection && opts.use_chart_recognition)
            .then_some(true),
    })
}

fn file_type_for(ext: &str) -> u8 {
    if ext == "pdf" {
        FILE_TYPE_PDF
    } else {
        FILE_TYPE_IMAGE
    }
}
