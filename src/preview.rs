//! Input preview: a small HTML fragment showing what is about to be sent.
//!
//! PDFs get a fixed icon placeholder (browsers cannot inline-preview them
//! without a viewer); URLs are referenced directly; local images are
//! inlined as data URLs so the fragment works without a file server.
//! This helper never errors — an unreadable file degrades to an empty
//! `src` with a logged warning.

use crate::pipeline::input::{file_extension, is_url};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::warn;

const PDF_ICON_HTML: &str = "<div style=\"display:flex;flex-direction:column;align-items:center;justify-content:center;padding:40px;color:#64748b;\"><div style=\"width:80px;height:100px;background:linear-gradient(135deg,#f87171 0%,#dc2626 100%);border-radius:8px;display:flex;align-items:center;justify-content:center;box-shadow:0 4px 6px rgba(0,0,0,0.1);margin-bottom:12px;\"><span style=\"color:white;font-size:24px;font-weight:bold;\">PDF</span></div><span style=\"font-size:14px;\">PDF Document</span></div>";

/// MIME type for a lowercased extension (no dot). Unknown extensions fall
/// back to JPEG; `.tif/.tiff` and `.svg` are deliberately not mapped.
fn mime_type_for(ext: &str) -> &'static str {
    match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "image/jpeg",
    }
}

/// Convert a local image file to a base64 data URL, or `""` if unreadable.
fn image_to_data_url(path: &str) -> String {
    match std::fs::read(path) {
        Ok(bytes) => {
            let mime = mime_type_for(&file_extension(path));
            format!("data:{};base64,{}", mime, STANDARD.encode(&bytes))
        }
        Err(e) => {
            warn!("Failed to read '{}' for preview: {}", path, e);
            String::new()
        }
    }
}

/// Render the preview fragment for an input reference.
pub fn render_preview(path_or_url: &str) -> String {
    if path_or_url.is_empty() {
        return String::new();
    }

    // The extension check runs on the raw reference, so a URL with a query
    // string after ".pdf" falls through to the image branch.
    if file_extension(path_or_url) == "pdf" {
        return PDF_ICON_HTML.to_string();
    }

    let src = if is_url(path_or_url) {
        path_or_url.to_string()
    } else {
        image_to_data_url(path_or_url)
    };

    format!("<img src=\"{src}\" alt=\"Preview\" loading=\"lazy\" />")
}
