//! Result types returned by the summarization entry points.

use crate::config::UploadStrategy;
use crate::document::DocumentInfo;
use serde::{Deserialize, Serialize};

/// The outcome of a successful summarization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryOutput {
    /// Freeform natural-language summary text from the service.
    pub summary: String,
    /// Metadata of the summarized document (no content bytes).
    pub document: DocumentInfo,
    /// Timing and workflow statistics.
    pub stats: SummaryStats,
}

/// Statistics for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Strategy that produced the summary.
    pub strategy: UploadStrategy,
    /// Number of status polls issued (always 0 for the inline strategy).
    pub poll_attempts: u32,
    /// Time spent uploading and waiting for processing, in milliseconds
    /// (0 for the inline strategy).
    pub upload_duration_ms: u64,
    /// Time spent in the generation request, in milliseconds.
    pub generation_duration_ms: u64,
    /// Wall-clock duration of the whole run, in milliseconds.
    pub total_duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_round_trips_through_json() {
        let out = SummaryOutput {
            summary: "A summary.".into(),
            document: DocumentInfo {
                display_name: "doc.pdf".into(),
                mime_type: "application/pdf".into(),
                byte_len: 1234,
            },
            stats: SummaryStats {
                strategy: UploadStrategy::Inline,
                poll_attempts: 0,
                upload_duration_ms: 0,
                generation_duration_ms: 37,
                total_duration_ms: 40,
            },
        };
        let json = serde_json::to_string(&out).unwrap();
        assert!(json.contains("\"inline\""));
        let back: SummaryOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.summary, "A summary.");
        assert_eq!(back.document.byte_len, 1234);
    }
}
