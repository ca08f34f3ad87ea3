//! Error types for the pdfsum library.
//!
//! A single [`SummarizeError`] covers the whole run because every failure is
//! terminal for the current summarization: there is no per-item partial
//! success to track.
//!
//! The variants deliberately keep three protocol failures distinct:
//!
//! * [`SummarizeError::UploadFailed`]: the ingestion endpoint rejected the
//!   request (non-success HTTP status).
//! * [`SummarizeError::UploadResponseMalformed`]: the ingestion endpoint
//!   *accepted* the request but returned an empty or unparsable body. This is
//!   a documented real-world behaviour of the service and callers may want to
//!   re-run with the inline strategy, so it must not be folded into a generic
//!   transport error.
//! * [`SummarizeError::ProcessingFailed`]: the service reported a terminal
//!   `FAILED` state while the upload was being processed.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdfsum library.
#[derive(Debug, Error)]
pub enum SummarizeError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── Validation errors (reported before any network call) ─────────────
    /// No API key was supplied.
    #[error(
        "No API key provided.\nSet GEMINI_API_KEY, pass --api-key, or save one with --save-key."
    )]
    MissingApiKey,

    /// The document's declared MIME type is not PDF.
    #[error("Unsupported document type '{mime_type}': only application/pdf is accepted")]
    UnsupportedDocumentType { mime_type: String },

    /// The document exceeds the configured size limit.
    #[error("Document is {bytes} bytes, which exceeds the {limit}-byte limit\nRaise --max-size-mb if the service accepts larger uploads.")]
    DocumentTooLarge { bytes: usize, limit: usize },

    // ── Upload / polling errors (reference strategy) ──────────────────────
    /// Non-success HTTP response from the file-ingestion endpoint.
    #[error("File upload failed (HTTP {status}): {message}")]
    UploadFailed { status: u16, message: String },

    /// The ingestion endpoint returned HTTP success but an empty or
    /// unparsable body. Distinct from [`Self::UploadFailed`] so callers can
    /// fall back to the inline strategy.
    #[error("File upload was acknowledged but the response was unusable: {detail}\nThe service occasionally returns an empty acknowledgement; retry with --inline.")]
    UploadResponseMalformed { detail: String },

    /// Non-success HTTP response while polling the file's processing state.
    #[error("File status check failed (HTTP {status}): {message}")]
    StatusPollFailed { status: u16, message: String },

    /// The service reported a terminal FAILED state for the uploaded file.
    #[error("The service failed to process the uploaded file '{name}'")]
    ProcessingFailed { name: String },

    /// The file never left the PROCESSING state within the attempt budget.
    #[error("File '{name}' was still processing after {attempts} polls\nRaise --max-polls or retry later.")]
    ProcessingTimeout { name: String, attempts: u32 },

    // ── Generation errors ─────────────────────────────────────────────────
    /// Non-success HTTP response from the content-generation endpoint.
    #[error("Summary generation failed (HTTP {status}): {message}")]
    GenerationFailed { status: u16, message: String },

    /// HTTP success but the body could not be parsed where content was expected.
    #[error("The service returned a malformed response: {detail}")]
    MalformedResponse { detail: String },

    /// Well-formed success response containing no text-bearing content part.
    #[error("The service returned no summary text for this document")]
    NoSummaryProduced,

    /// The request never produced an HTTP response (connection refused,
    /// timeout, TLS failure).
    #[error("Request to the {endpoint} endpoint failed: {reason}")]
    RequestFailed { endpoint: String, reason: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing the stored credential failed.
    #[error("Credential store error at '{path}': {detail}")]
    CredentialStore { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SummarizeError {
    /// Map a transport-level reqwest error to the matching variant for the
    /// named endpoint.
    pub(crate) fn transport(endpoint: &str, err: reqwest::Error) -> Self {
        SummarizeError::RequestFailed {
            endpoint: endpoint.to_string(),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_failed_display() {
        let e = SummarizeError::UploadFailed {
            status: 403,
            message: "API key not valid".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("403"), "got: {msg}");
        assert!(msg.contains("API key not valid"));
    }

    #[test]
    fn malformed_upload_ack_suggests_inline() {
        let e = SummarizeError::UploadResponseMalformed {
            detail: "empty body".into(),
        };
        assert!(e.to_string().contains("--inline"));
    }

    #[test]
    fn too_large_display_carries_both_sizes() {
        let e = SummarizeError::DocumentTooLarge {
            bytes: 30_000_000,
            limit: 20_971_520,
        };
        let msg = e.to_string();
        assert!(msg.contains("30000000"));
        assert!(msg.contains("20971520"));
    }

    #[test]
    fn processing_timeout_display() {
        let e = SummarizeError::ProcessingTimeout {
            name: "files/abc".into(),
            attempts: 120,
        };
        assert!(e.to_string().contains("120 polls"));
    }
}
