//! Workflow entry points: validate, then run the client to completion.
//!
//! Each function drives one run from start to finish; there is no partial
//! result and no concurrent overlap within a run. Validation happens first
//! and fails fast with a descriptive error before any network call: missing
//! credential, wrong document type, oversized document. After that the run
//! is a linear await chain whose only suspension points are the network
//! requests and, for the reference strategy, the polling sleeps.

use crate::client::SummaryClient;
use crate::config::SummaryConfig;
use crate::document::{self, DocumentHandle};
use crate::error::SummarizeError;
use crate::input;
use crate::output::SummaryOutput;
use std::path::Path;
use tracing::info;

/// Summarize a PDF given a local path or HTTP(S) URL.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input_str`: local file path or HTTP/HTTPS URL to a PDF
/// * `api_key`: credential for the external service
/// * `config`: run configuration
///
/// # Errors
/// Validation errors (`MissingApiKey`, `UnsupportedDocumentType`,
/// `DocumentTooLarge`) are returned before any network call. Everything else
/// maps one-to-one onto a workflow step; see [`SummarizeError`].
pub async fn summarize(
    input_str: impl AsRef<str>,
    api_key: &str,
    config: &SummaryConfig,
) -> Result<SummaryOutput, SummarizeError> {
    let input_str = input_str.as_ref();
    info!("Starting summarization: {}", input_str);

    if api_key.trim().is_empty() {
        return Err(SummarizeError::MissingApiKey);
    }

    let doc = input::resolve_input(input_str, config.download_timeout_secs).await?;
    summarize_document(&doc, api_key, config).await
}

/// Summarize an already-constructed [`DocumentHandle`].
pub async fn summarize_document(
    doc: &DocumentHandle,
    api_key: &str,
    config: &SummaryConfig,
) -> Result<SummaryOutput, SummarizeError> {
    if api_key.trim().is_empty() {
        return Err(SummarizeError::MissingApiKey);
    }
    if !document::is_supported_document(doc) {
        return Err(SummarizeError::UnsupportedDocumentType {
            mime_type: doc.mime_type().to_string(),
        });
    }
    if !document::is_within_size_limit(doc, config.max_document_bytes) {
        return Err(SummarizeError::DocumentTooLarge {
            bytes: doc.len(),
            limit: config.max_document_bytes,
        });
    }

    let client = SummaryClient::new(api_key, config)?;
    client.produce_summary(doc, config).await
}

/// Summarize raw PDF bytes held in memory.
///
/// Recommended when the document comes from a database or network stream
/// rather than a file on disk. The bytes are validated against the `%PDF`
/// magic before anything is sent.
pub async fn summarize_bytes(
    bytes: Vec<u8>,
    display_name: impl Into<String>,
    api_key: &str,
    config: &SummaryConfig,
) -> Result<SummaryOutput, SummarizeError> {
    let display_name = display_name.into();
    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        let n = bytes.len().min(4);
        magic[..n].copy_from_slice(&bytes[..n]);
        return Err(SummarizeError::NotAPdf {
            path: display_name.into(),
            magic,
        });
    }
    let doc = DocumentHandle::pdf(display_name, bytes);
    summarize_document(&doc, api_key, config).await
}

/// Summarize and write the result text to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn summarize_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    api_key: &str,
    config: &SummaryConfig,
) -> Result<SummaryOutput, SummarizeError> {
    let output = summarize(input_str, api_key, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                SummarizeError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                }
            })?;
        }
    }

    let tmp_path = path.with_extension("txt.tmp");
    tokio::fs::write(&tmp_path, &output.summary)
        .await
        .map_err(|e| SummarizeError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| SummarizeError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output)
}

/// Synchronous wrapper around [`summarize`].
///
/// Creates a temporary tokio runtime internally; do not call from inside an
/// async context.
pub fn summarize_sync(
    input_str: impl AsRef<str>,
    api_key: &str,
    config: &SummaryConfig,
) -> Result<SummaryOutput, SummarizeError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| SummarizeError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(summarize(input_str, api_key, config))
}
