//! Pipeline stages for one request/response cycle.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations without touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ payload ──▶ client ──▶ reconstruct ──▶ postprocess
//! (URL/path) (encode)   (HTTP)    (md + HTML)      (math escaping)
//! ```
//!
//! 1. [`input`]   — classify the user-supplied reference and read its bytes
//! 2. [`payload`] — assemble the wire payload (base64 or pass-through URL)
//!    with per-mode parameters
//! 3. [`client`]  — drive the service call and enforce the envelope
//!    contract; the only stage with mandatory network I/O
//! 4. [`reconstruct`] — rebuild multi-page Markdown and the visualization
//!    HTML fragment from the page list
//! 5. [`postprocess`] — escape inequality operators inside math spans so a
//!    Markdown renderer does not read them as HTML tags

pub mod client;
pub mod input;
pub mod payload;
pub mod postprocess;
pub mod reconstruct;
