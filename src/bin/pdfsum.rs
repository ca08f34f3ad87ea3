//! CLI binary for pdfsum.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `SummaryConfig`, resolves the API credential, and prints results.

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdfsum::{
    summarize, summarize_to_file, CredentialStore, FileCredentialStore, ProgressCallback,
    SummaryConfig, SummaryProgressCallback, UploadStrategy,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one spinner whose message tracks the
/// workflow phase (upload → processing polls → generation).
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Summarizing");
        bar.set_message("Preparing…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl SummaryProgressCallback for CliProgressCallback {
    fn on_upload_start(&self, byte_len: usize) {
        self.bar.set_message(format!(
            "Uploading {:.1} MiB…",
            byte_len as f64 / (1024.0 * 1024.0)
        ));
    }

    fn on_upload_complete(&self, file_name: &str) {
        self.bar
            .println(format!("  {} uploaded as {}", green("✓"), dim(file_name)));
        self.bar.set_message("Waiting for processing…");
    }

    fn on_processing_poll(&self, state: &str, attempt: u32) {
        self.bar
            .set_message(format!("{state} (poll {attempt})…"));
    }

    fn on_generate_start(&self) {
        self.bar.set_message("Generating summary…");
    }

    fn on_complete(&self, summary_len: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} summary ready ({} chars)",
            green("✔"),
            bold(&summary_len.to_string())
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic summarization (stdout)
  pdfsum document.pdf

  # Write the summary to a file
  pdfsum document.pdf -o summary.txt

  # Summarize from a URL
  pdfsum https://arxiv.org/pdf/1706.03762 -o attention.txt

  # Small document, single round trip (no upload/polling)
  pdfsum --inline invoice.pdf

  # Custom instruction and model
  pdfsum --prompt "Summarize in three bullet points" --model gemini-2.5-pro paper.pdf

  # Structured JSON output with stats
  pdfsum --json document.pdf > result.json

  # Save the key once, then omit it
  pdfsum --api-key AIza... --save-key document.pdf
  pdfsum another.pdf

STRATEGIES:
  reference (default)  upload to the Files API, poll until processed, then
                       generate against the file URI; scales to large PDFs
  --inline             embed the PDF as base64 in a single generation request;
                       one round trip, bounded by the size limit

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY       API key for the Gemini API
  PDFSUM_MODEL         Override the model ID

SETUP:
  1. Get an API key from https://aistudio.google.com/apikey
  2. export GEMINI_API_KEY=AIza...
  3. pdfsum document.pdf
"#;

/// Summarize PDF files and URLs with the Google Gemini API.
#[derive(Parser, Debug)]
#[command(
    name = "pdfsum",
    version,
    about = "Summarize PDF files and URLs with the Google Gemini API",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    #[arg(required_unless_present = "forget_key")]
    input: Option<String>,

    /// Write the summary to this file instead of stdout.
    #[arg(short, long, env = "PDFSUM_OUTPUT")]
    output: Option<PathBuf>,

    /// Model ID (e.g. gemini-2.0-flash, gemini-2.5-pro).
    #[arg(long, env = "PDFSUM_MODEL")]
    model: Option<String>,

    /// API key. Falls back to the saved key when omitted.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Inline strategy: embed the PDF in a single generation request.
    #[arg(long, env = "PDFSUM_INLINE")]
    inline: bool,

    /// Custom instruction text for the generation request.
    #[arg(long, env = "PDFSUM_PROMPT")]
    prompt: Option<String>,

    /// Maximum accepted document size in MiB.
    #[arg(long, env = "PDFSUM_MAX_SIZE_MB", default_value_t = 20)]
    max_size_mb: usize,

    /// Seconds between processing-state polls.
    #[arg(long, env = "PDFSUM_POLL_INTERVAL", default_value_t = 5)]
    poll_interval: u64,

    /// Maximum number of processing-state polls before giving up.
    #[arg(long, env = "PDFSUM_MAX_POLLS", default_value_t = 120)]
    max_polls: u32,

    /// Per-request timeout in seconds.
    #[arg(long, env = "PDFSUM_API_TIMEOUT", default_value_t = 300)]
    api_timeout: u64,

    /// HTTP download timeout for URL inputs in seconds.
    #[arg(long, env = "PDFSUM_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Output structured JSON (summary + stats) instead of plain text.
    #[arg(long, env = "PDFSUM_JSON")]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "PDFSUM_NO_PROGRESS")]
    no_progress: bool,

    /// Suppress all output except errors and the summary itself.
    #[arg(short, long, env = "PDFSUM_QUIET")]
    quiet: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFSUM_VERBOSE")]
    verbose: bool,

    /// Persist the resolved API key for future runs.
    #[arg(long)]
    save_key: bool,

    /// Delete the saved API key and exit.
    #[arg(long)]
    forget_key: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the spinner is active; the
    // spinner provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
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

    // ── Credential store ─────────────────────────────────────────────────
    let store = FileCredentialStore::default_location().context("Credential store unavailable")?;

    if cli.forget_key {
        store.clear().context("Failed to remove the saved key")?;
        if !cli.quiet {
            eprintln!("{} saved key removed", green("✔"));
        }
        return Ok(());
    }

    let api_key = match cli.api_key.clone() {
        Some(key) if !key.trim().is_empty() => key.trim().to_string(),
        _ => match store.load().context("Failed to read the saved key")? {
            Some(key) => key,
            None => bail!(
                "No API key provided.\nSet GEMINI_API_KEY, pass --api-key, \
                 or save one with --save-key."
            ),
        },
    };

    if cli.save_key {
        store.save(&api_key).context("Failed to save the key")?;
        if !cli.quiet {
            eprintln!("{} key saved to {}", green("✔"), dim(&store.path().display().to_string()));
        }
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn SummaryProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;
    let input = cli.input.as_deref().expect("clap requires input");

    // ── Run ──────────────────────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        let output = summarize_to_file(input, output_path, &api_key, &config)
            .await
            .context("Summarization failed")?;

        if !cli.quiet {
            eprintln!(
                "{}  {} chars  {}ms  →  {}",
                green("✔"),
                output.summary.len(),
                output.stats.total_duration_ms,
                bold(&output_path.display().to_string()),
            );
        }
    } else {
        let output = summarize(input, &api_key, &config)
            .await
            .context("Summarization failed")?;

        if cli.json {
            let json =
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
            println!("{json}");
        } else {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(output.summary.as_bytes())
                .context("Failed to write to stdout")?;
            if !output.summary.ends_with('\n') {
                handle.write_all(b"\n").ok();
            }
        }

        if !cli.quiet && !show_progress && !cli.json {
            eprintln!(
                "Summarized '{}' in {}ms ({} polls)",
                output.document.display_name,
                output.stats.total_duration_ms,
                output.stats.poll_attempts
            );
        }
    }

    Ok(())
}

/// Map CLI args to `SummaryConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<SummaryConfig> {
    let strategy = if cli.inline {
        UploadStrategy::Inline
    } else {
        UploadStrategy::Reference
    };

    let mut builder = SummaryConfig::builder()
        .strategy(strategy)
        .max_document_bytes(cli.max_size_mb.saturating_mul(1024 * 1024))
        .poll_interval_ms(cli.poll_interval.saturating_mul(1000))
        .max_poll_attempts(cli.max_polls)
        .api_timeout_secs(cli.api_timeout)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref prompt) = cli.prompt {
        builder = builder.prompt(prompt.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
