//! In-memory document handle and the pure validation checks applied to it.
//!
//! A [`DocumentHandle`] is immutable once constructed: selecting a different
//! document means building a new handle, never mutating an existing one. The
//! validation functions are pure predicates with no failure mode beyond
//! returning `false`, so the orchestrator can fail fast with a descriptive
//! error before any network call is made.

use serde::{Deserialize, Serialize};

/// MIME type accepted by the summarization workflow.
pub const PDF_MIME: &str = "application/pdf";

/// Default upload size limit: 20 MiB.
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 20 * 1024 * 1024;

/// An in-memory reference to the selected document: raw bytes, the declared
/// MIME type, and a display name forwarded to the service as upload metadata.
#[derive(Clone)]
pub struct DocumentHandle {
    display_name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl DocumentHandle {
    /// Build a handle from raw bytes with an explicit MIME type.
    pub fn new(
        display_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Build a handle declared as PDF.
    pub fn pdf(display_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(display_name, PDF_MIME, bytes)
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Byte length of the document content.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Metadata projection used in [`crate::output::SummaryOutput`].
    pub fn info(&self) -> DocumentInfo {
        DocumentInfo {
            display_name: self.display_name.clone(),
            mime_type: self.mime_type.clone(),
            byte_len: self.bytes.len(),
        }
    }
}

impl std::fmt::Debug for DocumentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentHandle")
            .field("display_name", &self.display_name)
            .field("mime_type", &self.mime_type)
            .field("byte_len", &self.bytes.len())
            .finish()
    }
}

/// Serializable document metadata (no content bytes).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub display_name: String,
    pub mime_type: String,
    pub byte_len: usize,
}

/// True iff the handle's declared MIME type is the PDF media type.
pub fn is_supported_document(doc: &DocumentHandle) -> bool {
    doc.mime_type == PDF_MIME
}

/// True iff the document's byte length is within `max_bytes`, inclusive.
pub fn is_within_size_limit(doc: &DocumentHandle, max_bytes: usize) -> bool {
    doc.len() <= max_bytes
}
