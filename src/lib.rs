//! # doclens
//!
//! Client for vision document-understanding services: submit a document
//! image or PDF and get back structured results — reconstructed Markdown,
//! an HTML visualization fragment, and raw text/JSON.
//!
//! ## Why this crate?
//!
//! Layout-parsing services answer with a deeply nested, loosely-shaped JSON
//! envelope: per-page markdown with placeholder image paths, image maps
//! whose values may be URLs, bare base64, or data URLs, and mode-specific
//! extras that are simply absent on other modes. This crate owns that
//! translation in both directions — it normalises heterogeneous input
//! (local file vs. URL, image vs. PDF) into the service's wire payload, and
//! reconstitutes the response into output a human can actually read.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input reference (path or URL)
//!  │
//!  ├─ 1. Payload   classify + base64-embed or pass through, per-mode params
//!  ├─ 2. Client    single POST, envelope contract, one error channel
//!  ├─ 3. Rebuild   page list → Markdown with page markers + viz HTML
//!  └─ 4. Escape    `<`/`>` inside math spans → \lt, \gt, \le, \ge
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use doclens::{parse_document, ParseOptions, Settings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings {
//!         api_url: "http://localhost:8080/layout-parsing".into(),
//!         ..Settings::default()
//!     };
//!     let (preview, raw, vis_html) =
//!         parse_document("scan.png", &ParseOptions::default(), &settings).await?;
//!     println!("{preview}");
//!     let _ = (raw, vis_html);
//!     Ok(())
//! }
//! ```
//!
//! ## Recognition Modes
//!
//! | Mode | Entry point | Output |
//! |------|-------------|--------|
//! | Document parsing | [`parse_document`] | Full-page Markdown + page visualizations |
//! | Targeted recognition | [`recognize_element`] | Single-element Markdown (`ocr`, `formula`, `table`, `chart`, `seal`) |
//! | Spotting | [`recognize_element`] with [`RecognitionTask::Spotting`] | Pruned JSON + annotated image |
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `doclens` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! doclens = { version = "0.2", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod dispatch;
pub mod error;
pub mod pipeline;
pub mod preview;
pub mod response;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{Settings, DEFAULT_API_URL};
pub use dispatch::{parse_document, recognize_element, ParseOptions, RecognitionTask};
pub use error::DocLensError;
pub use pipeline::client::submit;
pub use pipeline::payload::{encode, PayloadOptions, RequestPayload};
pub use pipeline::postprocess::escape_math_inequalities;
pub use pipeline::reconstruct::{reconstruct, resolve_image_ref};
pub use preview::render_preview;
pub use response::{MarkdownBlock, PageResult, ResponseEnvelope, ResultBody};
