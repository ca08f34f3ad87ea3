//! Configuration types for the summarization workflow.
//!
//! All behaviour is controlled through [`SummaryConfig`], built via its
//! [`SummaryConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across calls and to diff two runs to understand
//! why their outputs differ.

use crate::document::DEFAULT_MAX_DOCUMENT_BYTES;
use crate::error::SummarizeError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default model used for generation requests.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default service base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// How the document reaches the generation endpoint.
///
/// Both variants implement the same contract (document in, summary out)
/// and are selected explicitly by the caller rather than branching inside
/// the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStrategy {
    /// Upload to the Files API, poll until processed, then generate against
    /// the resolved file URI. Scales to large documents; exposes the
    /// polling state machine and its processing-failure mode. (default)
    #[default]
    Reference,
    /// Embed the document as inline base64 in a single generation request.
    /// One round trip, no polling; payload bounded by the size limit.
    Inline,
}

/// Configuration for a summarization run.
///
/// Built via [`SummaryConfig::builder()`] or [`SummaryConfig::default()`].
///
/// # Example
/// ```rust
/// use pdfsum::{SummaryConfig, UploadStrategy};
///
/// let config = SummaryConfig::builder()
///     .strategy(UploadStrategy::Inline)
///     .model("gemini-2.0-flash")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct SummaryConfig {
    /// Model identifier used for the generation request. Default: `gemini-2.0-flash`.
    pub model: String,

    /// Service base URL. Default: the public Gemini endpoint.
    ///
    /// Overridable so tests can point the client at a local mock server.
    pub base_url: String,

    /// Which request strategy to use. Default: [`UploadStrategy::Reference`].
    pub strategy: UploadStrategy,

    /// Instruction text for the generation request.
    /// If `None`, uses [`crate::prompts::DEFAULT_SUMMARY_PROMPT`].
    pub prompt: Option<String>,

    /// Maximum accepted document size in bytes, boundary inclusive.
    /// Default: 20 MiB. The service rejects larger uploads anyway, and the
    /// inline strategy embeds this many bytes (×4/3 as base64) in one body.
    pub max_document_bytes: usize,

    /// Delay between status polls in milliseconds. Default: 5000.
    pub poll_interval_ms: u64,

    /// Maximum number of status polls before giving up. Default: 120.
    ///
    /// The observed service behaviour has no documented upper bound on
    /// processing time; an unbounded loop would hang the caller forever on a
    /// stuck file. 120 polls at the default interval is ten minutes.
    pub max_poll_attempts: u32,

    /// Per-request timeout in seconds, covering upload, poll, and generation
    /// calls. Default: 300 (a 20 MiB upload on a slow link needs headroom).
    pub api_timeout_secs: u64,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Optional phase-event callback. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            strategy: UploadStrategy::default(),
            prompt: None,
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            poll_interval_ms: 5000,
            max_poll_attempts: 120,
            api_timeout_secs: 300,
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SummaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummaryConfig")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("strategy", &self.strategy)
            .field("prompt", &self.prompt)
            .field("max_document_bytes", &self.max_document_bytes)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("max_poll_attempts", &self.max_poll_attempts)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl SummaryConfig {
    /// Create a new builder for `SummaryConfig`.
    pub fn builder() -> SummaryConfigBuilder {
        SummaryConfigBuilder {
            config: Self::default(),
        }
    }

    /// The effective instruction text for generation requests.
    pub fn prompt_text(&self) -> &str {
        self.prompt
            .as_deref()
            .unwrap_or(crate::prompts::DEFAULT_SUMMARY_PROMPT)
    }
}

/// Builder for [`SummaryConfig`].
pub struct SummaryConfigBuilder {
    config: SummaryConfig,
}

impl SummaryConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn strategy(mut self, strategy: UploadStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.prompt = Some(prompt.into());
        self
    }

    pub fn max_document_bytes(mut self, bytes: usize) -> Self {
        self.config.max_document_bytes = bytes.max(1);
        self
    }

    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.poll_interval_ms = ms.max(1);
        self
    }

    pub fn max_poll_attempts(mut self, n: u32) -> Self {
        self.config.max_poll_attempts = n.max(1);
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs.max(1);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SummaryConfig, SummarizeError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(SummarizeError::InvalidConfig(
                "Model identifier must not be empty".into(),
            ));
        }
        if !c.base_url.starts_with("http://") && !c.base_url.starts_with("https://") {
            return Err(SummarizeError::InvalidConfig(format!(
                "Base URL must be HTTP(S), got '{}'",
                c.base_url
            )));
        }
        Ok(self.config)
    }
}
