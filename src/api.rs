//! Wire types for the generative-AI service.
//!
//! Three endpoints are consumed: file ingestion (multipart POST), file
//! status (GET, polled), and content generation (JSON POST). This module
//! holds the serde shapes for all three plus the two normalizations the
//! service forces on clients:
//!
//! * The file record arrives either flat (`{"name": …}`) or wrapped
//!   (`{"file": {"name": …}}`) depending on the endpoint, and sometimes on
//!   the mood of the backend. [`unwrap_file_envelope`] is the single accessor
//!   that tolerates both, so no other code inspects the envelope.
//! * Generation responses can carry multiple text parts per candidate;
//!   [`extract_summary`] concatenates every text-bearing part of the first
//!   candidate, in order, joined by newlines.

use crate::error::SummarizeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── File records (ingestion + status endpoints) ──────────────────────────

/// Processing state of an uploaded file, normalized from the raw string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileState {
    Processing,
    Active,
    Failed,
    /// Any other (or missing) state string the service may report.
    Other(Option<String>),
}

impl FileState {
    fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("PROCESSING") => FileState::Processing,
            Some("ACTIVE") => FileState::Active,
            Some("FAILED") => FileState::Failed,
            other => FileState::Other(other.map(str::to_string)),
        }
    }
}

/// Server-side bookkeeping record for an uploaded file.
///
/// `state` keeps the raw string for logging and progress callbacks;
/// [`FileRecord::state`] exposes the normalized [`FileState`].
#[derive(Debug, Clone, Deserialize)]
pub struct FileRecord {
    /// Server-assigned identifier, e.g. `files/abc123`.
    pub name: String,
    /// Raw processing state string as reported by the service.
    #[serde(default, rename = "state")]
    pub raw_state: Option<String>,
    /// Resolved URI, present once the file is active.
    #[serde(default)]
    pub uri: Option<String>,
    /// MIME type the service recorded for the upload.
    #[serde(default, rename = "mimeType")]
    pub mime_type: Option<String>,
}

impl FileRecord {
    /// Normalized processing state.
    pub fn state(&self) -> FileState {
        FileState::from_raw(self.raw_state.as_deref())
    }

    /// State string for logs and progress callbacks. A record without an
    /// explicit state is reported as `PROCESSING` until the service says
    /// otherwise.
    pub fn state_str(&self) -> &str {
        self.raw_state.as_deref().unwrap_or("PROCESSING")
    }
}

/// Normalize the service's inconsistent response envelope.
///
/// The ingestion endpoint wraps the record under a `file` key while the
/// status endpoint usually returns it flat; both shapes have been observed
/// from both endpoints. Accepts either and parses the inner object.
pub(crate) fn unwrap_file_envelope(value: Value) -> Result<FileRecord, serde_json::Error> {
    let inner = match value {
        Value::Object(mut map) if map.contains_key("file") => {
            map.remove("file").unwrap_or(Value::Null)
        }
        other => other,
    };
    serde_json::from_value(inner)
}

// ── Generation request ───────────────────────────────────────────────────

/// Body of a `generateContent` request.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
}

impl GenerateRequest {
    /// Request referencing a previously uploaded file by URI.
    pub fn with_file_uri(prompt: &str, mime_type: &str, file_uri: &str) -> Self {
        Self::from_parts(prompt, Part {
            file_data: Some(FileData {
                mime_type: mime_type.to_string(),
                file_uri: file_uri.to_string(),
            }),
            ..Part::default()
        })
    }

    /// Request embedding the document as inline base64 data.
    pub fn with_inline_data(prompt: &str, mime_type: &str, base64_data: String) -> Self {
        Self::from_parts(prompt, Part {
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data: base64_data,
            }),
            ..Part::default()
        })
    }

    fn from_parts(prompt: &str, document_part: Part) -> Self {
        GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: Some(prompt.to_string()),
                        ..Part::default()
                    },
                    document_part,
                ],
            }],
        }
    }
}

/// One content block: an ordered list of parts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A single content part. Exactly one of the fields is set per part.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_data: Option<FileData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

/// Reference to a service-side file resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    pub mime_type: String,
    pub file_uri: String,
}

/// Inline base64 document payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

// ── Generation response ──────────────────────────────────────────────────

/// Body of a `generateContent` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

/// Extract the summary text from a generation response.
///
/// Concatenates every text-bearing part of the first candidate's content,
/// in order, joined by newlines. A response with no candidates, no content,
/// or no text parts fails with [`SummarizeError::NoSummaryProduced`].
pub fn extract_summary(response: &GenerateResponse) -> Result<String, SummarizeError> {
    let texts: Vec<&str> = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect()
        })
        .unwrap_or_default();

    if texts.is_empty() {
        return Err(SummarizeError::NoSummaryProduced);
    }
    Ok(texts.join("\n"))
}

/// Pull the human-readable message out of a structured error body
/// (`{"error": {"message": …}}`), falling back to a generic status line.
pub(crate) fn error_body_message(body: &str, status: u16) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("HTTP {status}"))
}
