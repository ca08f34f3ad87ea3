//! Progress-callback trait for workflow phase events.
//!
//! Inject an [`Arc<dyn SummaryProgressCallback>`] via
//! [`crate::config::SummaryConfigBuilder::progress_callback`] to observe the
//! run as it moves through upload, polling, and generation.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a terminal spinner, a WebSocket, or a log without the
//! library knowing how the host application communicates. The trait is
//! `Send + Sync` so the config stays shareable across tasks even though a
//! single run is strictly sequential.

use std::sync::Arc;

/// Called by the summarization workflow at each phase boundary.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Within one run the methods are invoked sequentially
/// (the workflow has no internal concurrency).
pub trait SummaryProgressCallback: Send + Sync {
    /// Called just before the document is uploaded (reference strategy only).
    ///
    /// # Arguments
    /// * `byte_len`: size of the document being uploaded
    fn on_upload_start(&self, byte_len: usize) {
        let _ = byte_len;
    }

    /// Called once the ingestion endpoint acknowledged the upload.
    ///
    /// # Arguments
    /// * `file_name`: server-assigned file identifier (e.g. `files/abc123`)
    fn on_upload_complete(&self, file_name: &str) {
        let _ = file_name;
    }

    /// Called on each polling iteration while the file is still processing,
    /// before the delay for that iteration.
    ///
    /// # Arguments
    /// * `state`: the state string the service reported (e.g. `PROCESSING`)
    /// * `attempt`: 1-indexed poll attempt number
    fn on_processing_poll(&self, state: &str, attempt: u32) {
        let _ = (state, attempt);
    }

    /// Called just before the content-generation request is sent.
    fn on_generate_start(&self) {}

    /// Called when the summary has been extracted successfully.
    ///
    /// # Arguments
    /// * `summary_len`: byte length of the produced summary
    fn on_complete(&self, summary_len: usize) {
        let _ = summary_len;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl SummaryProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SummaryConfig`].
pub type ProgressCallback = Arc<dyn SummaryProgressCallback>;
