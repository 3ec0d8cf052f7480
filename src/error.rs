//! Error types for the doclens library.
//!
//! The taxonomy follows the four failure modes a request can hit, in the
//! order they can occur:
//!
//! * Validation — bad caller input, detected before any I/O
//!   ([`DocLensError::MissingInput`], [`DocLensError::MissingPromptLabel`]).
//! * Input I/O — the referenced file or URL could not be read
//!   ([`DocLensError::FileRead`], [`DocLensError::DownloadFailed`],
//!   [`DocLensError::DownloadTimeout`]).
//! * Transport — the service call itself failed at the HTTP level
//!   ([`DocLensError::ServiceCall`]).
//! * Service — the service answered with a well-formed envelope carrying a
//!   non-zero error code ([`DocLensError::Service`]).
//!
//! Every kind propagates unchanged to the caller. Nothing is retried and no
//! fallback content is substituted for a failed call.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the doclens library.
#[derive(Debug, Error)]
pub enum DocLensError {
    // ── Validation errors ─────────────────────────────────────────────────
    /// No input reference was supplied.
    #[error("Please upload a file first.")]
    MissingInput,

    /// Targeted recognition was requested without an element label.
    #[error("Please select a recognition type.")]
    MissingPromptLabel,

    // ── Input I/O errors ──────────────────────────────────────────────────
    /// A local input file could not be read.
    #[error("Failed to read '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A remote input URL was syntactically valid but the fetch failed.
    #[error("Failed to download '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Fetching a remote input exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Service errors ────────────────────────────────────────────────────
    /// Transport-level failure of the recognition call: DNS, connection
    /// refused, timeout, non-2xx status, or an unparseable body.
    #[error("API request failed: {reason}")]
    ServiceCall { reason: String },

    /// The service returned a well-formed envelope with a non-zero
    /// `errorCode`.
    #[error("API error: {message}")]
    Service { message: String },
}
