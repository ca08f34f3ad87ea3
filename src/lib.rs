//! # pdfsum
//!
//! Summarize PDF documents through the Google Gemini generative API.
//!
//! ## Why this crate?
//!
//! Getting a usable summary out of the Files API takes more plumbing than it
//! looks: a multipart upload, a polling loop over an inconsistently-shaped
//! status envelope, and a generation call whose response must be walked for
//! text parts. This crate wraps all of it behind one call and exposes the
//! two request strategies the service supports as an explicit choice.
//!
//! ## Workflow Overview
//!
//! ```text
//! PDF (path / URL / bytes)
//!  │
//!  ├─ 1. Input     resolve local file or download from URL (%PDF magic check)
//!  ├─ 2. Validate  MIME type is application/pdf, size ≤ 20 MiB (configurable)
//!  ├─ 3a. Reference  upload → poll every 5 s until ACTIVE → generate(fileUri)
//!  ├─ 3b. Inline     base64 bytes → generate(inlineData), single round trip
//!  └─ 4. Extract   join the first candidate's text parts with newlines
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfsum::{summarize, SummaryConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SummaryConfig::default();
//!     let api_key = std::env::var("GEMINI_API_KEY")?;
//!     let output = summarize("document.pdf", &api_key, &config).await?;
//!     println!("{}", output.summary);
//!     eprintln!("{} polls, {}ms total",
//!         output.stats.poll_attempts,
//!         output.stats.total_duration_ms);
//!     Ok(())
//! }
//! ```
//!
//! ## Choosing a Strategy
//!
//! | Strategy | Round trips | Scales to | Failure modes |
//! |----------|-------------|-----------|---------------|
//! | [`UploadStrategy::Reference`] (default) | upload + N polls + generate | large documents | upload rejection, processing failure, empty acknowledgement |
//! | [`UploadStrategy::Inline`] | one | size-limit-bounded payloads | generation errors only |
//!
//! The service occasionally acknowledges an upload with an empty body; that
//! surfaces as [`SummarizeError::UploadResponseMalformed`] and the natural
//! recovery is re-running with the inline strategy.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfsum` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdfsum = { version = "0.2", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod api;
pub mod client;
pub mod config;
pub mod credentials;
pub mod document;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;
pub mod prompts;
pub mod summarize;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::SummaryClient;
pub use config::{SummaryConfig, SummaryConfigBuilder, UploadStrategy};
pub use credentials::{CredentialStore, FileCredentialStore};
pub use document::{
    is_supported_document, is_within_size_limit, DocumentHandle, DocumentInfo, PDF_MIME,
};
pub use error::SummarizeError;
pub use output::{SummaryOutput, SummaryStats};
pub use progress::{NoopProgressCallback, ProgressCallback, SummaryProgressCallback};
pub use summarize::{
    summarize, summarize_bytes, summarize_document, summarize_sync, summarize_to_file,
};
