//! Integration tests for the summarization workflow against a mock service.
//!
//! Every network-facing behaviour is exercised here: the reference
//! strategy's upload/poll/generate chain, the inline strategy's single
//! round trip, and each documented failure mode. The mock server stands in
//! for all three endpoints; no live API calls are made.

use mockito::{Matcher, Server};
use pdfsum::{
    summarize_document, DocumentHandle, SummarizeError, SummaryConfig, SummaryProgressCallback,
    UploadStrategy,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn pdf_doc(len: usize) -> DocumentHandle {
    let mut bytes = b"%PDF-1.7\n".to_vec();
    bytes.resize(len, 0);
    DocumentHandle::pdf("test.pdf", bytes)
}

fn config_for(server: &Server, strategy: UploadStrategy) -> SummaryConfig {
    SummaryConfig::builder()
        .base_url(server.url())
        .strategy(strategy)
        .poll_interval_ms(1)
        .build()
        .unwrap()
}

/// Records every polling callback invocation.
struct PollRecorder {
    polls: Mutex<Vec<(String, u32)>>,
}

impl PollRecorder {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            polls: Mutex::new(Vec::new()),
        })
    }

    fn recorded(&self) -> Vec<(String, u32)> {
        self.polls.lock().unwrap().clone()
    }
}

impl SummaryProgressCallback for PollRecorder {
    fn on_processing_poll(&self, state: &str, attempt: u32) {
        self.polls.lock().unwrap().push((state.to_string(), attempt));
    }
}

// ── Reference strategy ───────────────────────────────────────────────────────

#[tokio::test]
async fn reference_polls_until_active_then_generates() {
    let mut server = Server::new_async().await;

    let upload_mock = server
        .mock("POST", "/upload/v1beta/files")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"file": {"name": "files/abc123", "state": "PROCESSING"}}"#)
        .create_async()
        .await;

    // First status poll still PROCESSING, second ACTIVE with a resolved uri.
    let poll_count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&poll_count);
    let status_mock = server
        .mock("GET", "/v1beta/files/abc123")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body_from_request(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                br#"{"name": "files/abc123", "state": "PROCESSING"}"#.to_vec()
            } else {
                br#"{"name": "files/abc123", "state": "ACTIVE",
                     "uri": "https://svc.example/v1beta/files/abc123",
                     "mimeType": "application/pdf"}"#
                    .to_vec()
            }
        })
        .expect(2)
        .create_async()
        .await;

    let generate_mock = server
        .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJsonString(
            r#"{"contents": [{"parts": [
                {"text": "Summarize this document"},
                {"fileData": {"mimeType": "application/pdf",
                              "fileUri": "https://svc.example/v1beta/files/abc123"}}
            ]}]}"#
                .to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"candidates": [{"content": {"parts": [{"text": "A"}, {"text": "B"}]}}]}"#)
        .create_async()
        .await;

    let recorder = PollRecorder::new();
    let mut config = config_for(&server, UploadStrategy::Reference);
    config.progress_callback = Some(Arc::clone(&recorder) as Arc<dyn SummaryProgressCallback>);

    let output = summarize_document(&pdf_doc(64), "test-key", &config)
        .await
        .expect("workflow should succeed");

    upload_mock.assert_async().await;
    status_mock.assert_async().await;
    generate_mock.assert_async().await;

    // Text parts of the first candidate, joined by newlines.
    assert_eq!(output.summary, "A\nB");
    assert_eq!(output.stats.poll_attempts, 2);
    assert_eq!(output.stats.strategy, UploadStrategy::Reference);

    // Exactly two delayed re-polls, each reported as PROCESSING.
    let polls = recorder.recorded();
    assert_eq!(
        polls,
        vec![("PROCESSING".to_string(), 1), ("PROCESSING".to_string(), 2)]
    );
}

#[tokio::test]
async fn terminal_failed_state_never_reaches_generation() {
    let mut server = Server::new_async().await;

    server
        .mock("POST", "/upload/v1beta/files")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"file": {"name": "files/bad", "state": "PROCESSING"}}"#)
        .create_async()
        .await;

    server
        .mock("GET", "/v1beta/files/bad")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"name": "files/bad", "state": "FAILED"}"#)
        .create_async()
        .await;

    let generate_mock = server
        .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let config = config_for(&server, UploadStrategy::Reference);
    let err = summarize_document(&pdf_doc(64), "test-key", &config)
        .await
        .unwrap_err();

    match err {
        SummarizeError::ProcessingFailed { name } => assert_eq!(name, "files/bad"),
        other => panic!("expected ProcessingFailed, got {other:?}"),
    }
    generate_mock.assert_async().await;
}

#[tokio::test]
async fn empty_upload_acknowledgement_is_malformed_not_polled() {
    let mut server = Server::new_async().await;

    server
        .mock("POST", "/upload/v1beta/files")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("")
        .create_async()
        .await;

    // No status endpoint is registered; polling would 501 and fail the
    // test with the wrong error if the client proceeded.
    let config = config_for(&server, UploadStrategy::Reference);
    let err = summarize_document(&pdf_doc(64), "test-key", &config)
        .await
        .unwrap_err();

    assert!(
        matches!(err, SummarizeError::UploadResponseMalformed { .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn upload_rejection_carries_structured_error_message() {
    let mut server = Server::new_async().await;

    server
        .mock("POST", "/upload/v1beta/files")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body(r#"{"error": {"code": 403, "message": "API key not valid"}}"#)
        .create_async()
        .await;

    let config = config_for(&server, UploadStrategy::Reference);
    let err = summarize_document(&pdf_doc(64), "test-key", &config)
        .await
        .unwrap_err();

    match err {
        SummarizeError::UploadFailed { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "API key not valid");
        }
        other => panic!("expected UploadFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_state_with_uri_proceeds_without_polling() {
    let mut server = Server::new_async().await;

    // Small uploads can come back already resolved, with no state field.
    server
        .mock("POST", "/upload/v1beta/files")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"file": {"name": "files/quick",
                         "uri": "https://svc.example/v1beta/files/quick",
                         "mimeType": "application/pdf"}}"#,
        )
        .create_async()
        .await;

    server
        .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"candidates": [{"content": {"parts": [{"text": "Quick."}]}}]}"#)
        .create_async()
        .await;

    let config = config_for(&server, UploadStrategy::Reference);
    let output = summarize_document(&pdf_doc(64), "test-key", &config)
        .await
        .unwrap();

    assert_eq!(output.summary, "Quick.");
    assert_eq!(output.stats.poll_attempts, 0);
}

#[tokio::test]
async fn bounded_polling_times_out_on_stuck_file() {
    let mut server = Server::new_async().await;

    server
        .mock("POST", "/upload/v1beta/files")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"file": {"name": "files/stuck", "state": "PROCESSING"}}"#)
        .create_async()
        .await;

    let status_mock = server
        .mock("GET", "/v1beta/files/stuck")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"name": "files/stuck", "state": "PROCESSING"}"#)
        .expect(3)
        .create_async()
        .await;

    let mut config = config_for(&server, UploadStrategy::Reference);
    config.max_poll_attempts = 3;

    let err = summarize_document(&pdf_doc(64), "test-key", &config)
        .await
        .unwrap_err();

    match err {
        SummarizeError::ProcessingTimeout { name, attempts } => {
            assert_eq!(name, "files/stuck");
            assert_eq!(attempts, 3);
        }
        other => panic!("expected ProcessingTimeout, got {other:?}"),
    }
    status_mock.assert_async().await;
}

// ── Inline strategy ──────────────────────────────────────────────────────────

#[tokio::test]
async fn inline_summarizes_in_a_single_round_trip() {
    let mut server = Server::new_async().await;

    let generate_mock = server
        .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"candidates": [{"content":
                {"parts": [{"text": "This document discusses X."}]}}]}"#,
        )
        .create_async()
        .await;

    // A 2 MiB valid PDF, comfortably within the 20 MiB default limit.
    let config = config_for(&server, UploadStrategy::Inline);
    let output = summarize_document(&pdf_doc(2 * 1024 * 1024), "test-key", &config)
        .await
        .expect("inline workflow should succeed");

    generate_mock.assert_async().await;
    assert_eq!(output.summary, "This document discusses X.");
    assert_eq!(output.stats.strategy, UploadStrategy::Inline);
    assert_eq!(output.stats.poll_attempts, 0);
    assert_eq!(output.stats.upload_duration_ms, 0);
}

#[tokio::test]
async fn inline_request_embeds_base64_payload() {
    let mut server = Server::new_async().await;

    use base64::{engine::general_purpose::STANDARD, Engine as _};
    let doc = pdf_doc(32);
    let expected_b64 = STANDARD.encode(doc.bytes());

    let generate_mock = server
        .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJsonString(format!(
            r#"{{"contents": [{{"parts": [
                {{"text": "Summarize this document"}},
                {{"inlineData": {{"mimeType": "application/pdf", "data": "{expected_b64}"}}}}
            ]}}]}}"#
        )))
        .with_status(200)
        .with_body(r#"{"candidates": [{"content": {"parts": [{"text": "ok"}]}}]}"#)
        .create_async()
        .await;

    let config = config_for(&server, UploadStrategy::Inline);
    summarize_document(&doc, "test-key", &config).await.unwrap();

    generate_mock.assert_async().await;
}

#[tokio::test]
async fn response_without_candidates_is_no_summary() {
    let mut server = Server::new_async().await;

    server
        .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let config = config_for(&server, UploadStrategy::Inline);
    let err = summarize_document(&pdf_doc(64), "test-key", &config)
        .await
        .unwrap_err();

    assert!(matches!(err, SummarizeError::NoSummaryProduced), "got {err:?}");
}

#[tokio::test]
async fn generation_http_error_surfaces_status_and_message() {
    let mut server = Server::new_async().await;

    server
        .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body(r#"{"error": {"code": 503, "message": "The model is overloaded"}}"#)
        .create_async()
        .await;

    let config = config_for(&server, UploadStrategy::Inline);
    let err = summarize_document(&pdf_doc(64), "test-key", &config)
        .await
        .unwrap_err();

    match err {
        SummarizeError::GenerationFailed { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "The model is overloaded");
        }
        other => panic!("expected GenerationFailed, got {other:?}"),
    }
}

// ── Validation short-circuits ────────────────────────────────────────────────

#[tokio::test]
async fn validation_failures_issue_no_requests() {
    let mut server = Server::new_async().await;

    // Any request hitting the server fails the test.
    let catch_all = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let config = config_for(&server, UploadStrategy::Reference);

    let not_pdf = DocumentHandle::new("notes.txt", "text/plain", b"%PDF-fake".to_vec());
    assert!(matches!(
        summarize_document(&not_pdf, "test-key", &config).await,
        Err(SummarizeError::UnsupportedDocumentType { .. })
    ));

    let mut small_limit = config_for(&server, UploadStrategy::Reference);
    small_limit.max_document_bytes = 16;
    assert!(matches!(
        summarize_document(&pdf_doc(17), "test-key", &small_limit).await,
        Err(SummarizeError::DocumentTooLarge { .. })
    ));

    assert!(matches!(
        summarize_document(&pdf_doc(64), "", &config).await,
        Err(SummarizeError::MissingApiKey)
    ));

    catch_all.assert_async().await;
}
