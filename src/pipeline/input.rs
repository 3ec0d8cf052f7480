//! Input resolution: classify a user-supplied reference and read its bytes.
//!
//! The service accepts two input forms — a URL it fetches itself, or
//! base64-embedded content. This module supplies the raw material for both:
//! URL classification, local file reads, and the bounded-timeout remote
//! fetch used by the fetch-then-embed form.

use crate::error::DocLensError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Lowercased extension of a path string, without the dot (`"pdf"`, `"png"`,
/// or `""` when there is none).
pub fn file_extension(path: &str) -> String {
    Path::new(path)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Lowercased extension of a URL's path component.
///
/// Query strings and fragments are excluded, so
/// `https://host/scan.pdf?page=2` yields `"pdf"`.
pub fn url_path_extension(url: &str) -> String {
    reqwest::Url::parse(url)
        .map(|parsed| file_extension(parsed.path()))
        .unwrap_or_default()
}

/// Read a local input file.
pub async fn read_local(path_str: &str) -> Result<Vec<u8>, DocLensError> {
    let bytes = tokio::fs::read(path_str)
        .await
        .map_err(|source| DocLensError::FileRead {
            path: PathBuf::from(path_str),
            source,
        })?;
    debug!("Read local input: {} ({} bytes)", path_str, bytes.len());
    Ok(bytes)
}

/// Fetch a remote input URL with a bounded timeout.
pub async fn fetch_remote(url: &str, timeout_secs: u64) -> Result<Vec<u8>, DocLensError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| DocLensError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            DocLensError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            DocLensError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(DocLensError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| DocLensError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    debug!("Fetched remote input: {} ({} bytes)", url, bytes.len());
    Ok(bytes.to_vec())
}
