//! CLI binary for doclens.
//!
//! A thin shim over the library crate that maps CLI flags to `Settings`
//! and the two dispatch entry points, then prints results.

use anyhow::{Context, Result};
use clap::Parser;
use doclens::{
    parse_document, recognize_element, render_preview, ParseOptions, RecognitionTask, Settings,
    DEFAULT_API_URL,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Parse a full document (stdout gets the Markdown)
  doclens scan.png

  # Parse a PDF from a URL, keep the chart recogniser on
  doclens https://example.com/report.pdf --chart-recognition

  # Recognise a single element
  doclens formula.png --task formula

  # Spotting: bounding-box JSON plus annotated image
  doclens page.jpg --task spotting --raw --vis-output spots.html

  # Print the raw (source) Markdown instead of the rendered preview text
  doclens scan.png --raw

  # Inspect the outbound/inbound wire traffic
  doclens scan.png --debug

RECOGNITION TASKS:
  ocr        Text recognition (default fallback)
  formula    Formula recognition
  table      Table recognition
  chart      Chart recognition
  spotting   Classify + localise elements (bounding boxes)
  seal       Seal recognition

ENVIRONMENT VARIABLES:
  DOCLENS_API_URL   Recognition service endpoint
  DOCLENS_API_KEY   Bearer token for the service
"#;

/// Submit document images and PDFs to a recognition service.
#[derive(Parser, Debug)]
#[command(
    name = "doclens",
    version,
    about = "Submit document images and PDFs to a vision recognition service",
    long_about = "Submit a document image or PDF (local file or URL) to a remote \
document-understanding service and print the reconstructed Markdown, raw output, \
or visualization HTML.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local image/PDF path or HTTP/HTTPS URL.
    input: String,

    /// Targeted recognition task (ocr, formula, table, chart, spotting,
    /// seal). Omit for full document parsing.
    #[arg(short, long)]
    task: Option<String>,

    /// Run chart-to-table recognition (document parsing only).
    #[arg(long)]
    chart_recognition: bool,

    /// Skip document unwarping (document parsing only).
    #[arg(long)]
    skip_unwarping: bool,

    /// Skip orientation classification (document parsing only).
    #[arg(long)]
    skip_orientation: bool,

    /// Recognition service endpoint.
    #[arg(long, env = "DOCLENS_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// API key; sent as `Authorization: Bearer <key>` when set.
    #[arg(long, env = "DOCLENS_API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,

    /// Write the text output to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the visualization HTML fragment to this file.
    #[arg(long)]
    vis_output: Option<PathBuf>,

    /// Print the raw output (source Markdown, or spotting JSON) instead of
    /// the preview text.
    #[arg(long)]
    raw: bool,

    /// Print an HTML preview fragment for the input and exit (no API call).
    #[arg(long)]
    preview_only: bool,

    /// Log outbound payloads and inbound responses (base64 redacted).
    #[arg(short, long)]
    debug: bool,

    /// Suppress all output except errors and the result itself.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.debug {
        "doclens=debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Preview-only mode ────────────────────────────────────────────────
    if cli.preview_only {
        println!("{}", render_preview(&cli.input));
        return Ok(());
    }

    let settings = Settings {
        api_url: cli.api_url.clone(),
        api_key: cli.api_key.clone(),
        debug: cli.debug,
        ..Settings::default()
    };

    // A single long-running request deserves a spinner; the service can
    // legitimately take a minute on a dense multi-page PDF.
    let spinner = if cli.quiet {
        None
    } else {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(format!("Submitting {}…", cli.input));
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    };

    // ── Dispatch ─────────────────────────────────────────────────────────
    let result = match &cli.task {
        Some(choice) => {
            let task = RecognitionTask::from_choice(choice);
            recognize_element(&cli.input, task, &settings).await
        }
        None => {
            let opts = ParseOptions {
                use_chart_recognition: cli.chart_recognition,
                use_doc_unwarping: !cli.skip_unwarping,
                use_doc_orientation_classify: !cli.skip_orientation,
            };
            parse_document(&cli.input, &opts, &settings).await
        }
    };

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    let (preview, raw, vis_html) = result.context("Recognition failed")?;

    // ── Output ───────────────────────────────────────────────────────────
    let text = if cli.raw { &raw } else { &preview };

    if let Some(ref path) = cli.output {
        std::fs::write(path, text)
            .with_context(|| format!("Failed to write output to {}", path.display()))?;
        if !cli.quiet {
            eprintln!("Wrote {} bytes to {}", text.len(), path.display());
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(text.as_bytes())
            .context("Failed to write to stdout")?;
        if !text.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    if let Some(ref path) = cli.vis_output {
        std::fs::write(path, &vis_html)
            .with_context(|| format!("Failed to write visualization to {}", path.display()))?;
        if !cli.quiet {
            eprintln!(
                "Wrote visualization ({} bytes) to {}",
                vis_html.len(),
                path.display()
            );
        }
    }

    Ok(())
}
