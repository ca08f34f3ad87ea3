//! The summarization client: three endpoint calls and the polling loop.
//!
//! [`SummaryClient`] holds the HTTP client, base URL, and credential for its
//! lifetime and is stateless between invocations; each
//! [`SummaryClient::produce_summary`] call is an independent run.
//!
//! ## The two strategies
//!
//! ```text
//! Reference:  upload (multipart) ──▶ poll state every 5 s ──▶ generate(fileUri)
//! Inline:     base64(bytes) ────────────────────────────────▶ generate(inlineData)
//! ```
//!
//! The reference path is the scalable one but exposes a real state machine:
//! the uploaded file sits in `PROCESSING` until the service finishes, and can
//! terminate in `FAILED`. The inline path trades scalability for a single
//! round trip. Both converge on the same extraction step.
//!
//! The credential travels as the `key` query parameter; request URLs are
//! therefore never logged.

use crate::api::{
    error_body_message, extract_summary, unwrap_file_envelope, FileRecord, FileState,
    GenerateRequest, GenerateResponse,
};
use crate::config::{SummaryConfig, UploadStrategy};
use crate::document::DocumentHandle;
use crate::error::SummarizeError;
use crate::output::{SummaryOutput, SummaryStats};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::multipart;
use std::time::Instant;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

/// Client for the external summarization service.
pub struct SummaryClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SummaryClient {
    /// Build a client from a credential and the run configuration.
    pub fn new(api_key: impl Into<String>, config: &SummaryConfig) -> Result<Self, SummarizeError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| SummarizeError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn upload_url(&self) -> String {
        format!("{}/upload/v1beta/files?key={}", self.base_url, self.api_key)
    }

    fn status_url(&self, name: &str) -> String {
        format!("{}/v1beta/{}?key={}", self.base_url, name, self.api_key)
    }

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        )
    }

    /// Produce a summary for the document using the configured strategy.
    ///
    /// The run is strictly sequential: the upload completes before polling
    /// begins, and the terminal poll state is observed before generation is
    /// requested. Any error is terminal for this run; the client itself
    /// remains usable for further calls.
    pub async fn produce_summary(
        &self,
        doc: &DocumentHandle,
        config: &SummaryConfig,
    ) -> Result<SummaryOutput, SummarizeError> {
        let total_start = Instant::now();

        let (summary, poll_attempts, upload_duration_ms, generation_duration_ms) =
            match config.strategy {
                UploadStrategy::Reference => self.summarize_by_reference(doc, config).await?,
                UploadStrategy::Inline => self.summarize_inline(doc, config).await?,
            };

        if let Some(ref cb) = config.progress_callback {
            cb.on_complete(summary.len());
        }

        info!(
            "Summary produced: {} chars from '{}' in {}ms",
            summary.len(),
            doc.display_name(),
            total_start.elapsed().as_millis()
        );

        Ok(SummaryOutput {
            summary,
            document: doc.info(),
            stats: SummaryStats {
                strategy: config.strategy,
                poll_attempts,
                upload_duration_ms,
                generation_duration_ms,
                total_duration_ms: total_start.elapsed().as_millis() as u64,
            },
        })
    }

    // ── Strategy A: upload, poll, generate by URI ─────────────────────────

    async fn summarize_by_reference(
        &self,
        doc: &DocumentHandle,
        config: &SummaryConfig,
    ) -> Result<(String, u32, u64, u64), SummarizeError> {
        let upload_start = Instant::now();

        if let Some(ref cb) = config.progress_callback {
            cb.on_upload_start(doc.len());
        }

        let record = self.upload_document(doc).await?;
        info!("Uploaded '{}' as {}", doc.display_name(), record.name);

        if let Some(ref cb) = config.progress_callback {
            cb.on_upload_complete(&record.name);
        }

        let (record, poll_attempts) = self.poll_until_ready(record, config).await?;
        let upload_duration_ms = upload_start.elapsed().as_millis() as u64;

        let uri = record.uri.clone().ok_or_else(|| SummarizeError::MalformedResponse {
            detail: format!("file '{}' is ready but carries no uri", record.name),
        })?;
        let mime_type = record
            .mime_type
            .clone()
            .unwrap_or_else(|| doc.mime_type().to_string());

        let request = GenerateRequest::with_file_uri(config.prompt_text(), &mime_type, &uri);

        if let Some(ref cb) = config.progress_callback {
            cb.on_generate_start();
        }
        let generate_start = Instant::now();
        let response = self.generate(&request, config).await?;
        let generation_duration_ms = generate_start.elapsed().as_millis() as u64;

        let summary = extract_summary(&response)?;
        Ok((summary, poll_attempts, upload_duration_ms, generation_duration_ms))
    }

    /// Submit the raw bytes plus display-name metadata to the ingestion
    /// endpoint and parse the acknowledgement into a [`FileRecord`].
    pub(crate) async fn upload_document(
        &self,
        doc: &DocumentHandle,
    ) -> Result<FileRecord, SummarizeError> {
        let metadata = serde_json::json!({"file": {"display_name": doc.display_name()}});
        let metadata_part = multipart::Part::text(metadata.to_string())
            .mime_str("application/json")
            .map_err(|e| SummarizeError::Internal(format!("metadata part: {e}")))?;
        let file_part = multipart::Part::bytes(doc.bytes().to_vec())
            .file_name(doc.display_name().to_string())
            .mime_str(doc.mime_type())
            .map_err(|e| SummarizeError::Internal(format!("file part: {e}")))?;
        let form = multipart::Form::new()
            .part("metadata", metadata_part)
            .part("file", file_part);

        debug!("Uploading {} bytes to the ingestion endpoint", doc.len());
        let response = self
            .http
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| SummarizeError::transport("ingestion", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SummarizeError::transport("ingestion", e))?;

        if !status.is_success() {
            return Err(SummarizeError::UploadFailed {
                status: status.as_u16(),
                message: error_body_message(&body, status.as_u16()),
            });
        }
        if body.trim().is_empty() {
            // HTTP success with nothing behind it. The upload may or may not
            // have happened server-side; either way there is no identifier
            // to poll, so this run cannot continue.
            return Err(SummarizeError::UploadResponseMalformed {
                detail: "empty response body".into(),
            });
        }

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| SummarizeError::UploadResponseMalformed {
                detail: format!("unparsable body: {e}"),
            })?;
        unwrap_file_envelope(value).map_err(|e| SummarizeError::UploadResponseMalformed {
            detail: format!("unexpected shape: {e}"),
        })
    }

    /// Poll the file's state at the configured fixed interval until it
    /// leaves `PROCESSING`, invoking the progress callback on each iteration.
    ///
    /// Returns the final record and the number of polls issued.
    pub(crate) async fn poll_until_ready(
        &self,
        mut record: FileRecord,
        config: &SummaryConfig,
    ) -> Result<(FileRecord, u32), SummarizeError> {
        let mut attempts: u32 = 0;

        loop {
            match record.state() {
                FileState::Failed => {
                    warn!("File {} reached terminal FAILED state", record.name);
                    return Err(SummarizeError::ProcessingFailed { name: record.name });
                }
                FileState::Processing => {
                    if attempts >= config.max_poll_attempts {
                        return Err(SummarizeError::ProcessingTimeout {
                            name: record.name,
                            attempts,
                        });
                    }
                    attempts += 1;
                    if let Some(ref cb) = config.progress_callback {
                        cb.on_processing_poll(record.state_str(), attempts);
                    }
                    debug!("File {} still processing (poll {})", record.name, attempts);
                    sleep(Duration::from_millis(config.poll_interval_ms)).await;
                    record = self.fetch_file(&record.name).await?;
                }
                FileState::Active => {
                    debug!("File {} is active after {} polls", record.name, attempts);
                    return Ok((record, attempts));
                }
                FileState::Other(state) => {
                    // Neither PROCESSING nor FAILED. Small uploads come back
                    // without a state at all; proceed when the record is
                    // resolvable, fail otherwise.
                    if record.uri.is_some() {
                        debug!("File {} reported state {:?}, uri present", record.name, state);
                        return Ok((record, attempts));
                    }
                    return Err(SummarizeError::MalformedResponse {
                        detail: format!(
                            "file '{}' reported state {:?} with no uri",
                            record.name, state
                        ),
                    });
                }
            }
        }
    }

    /// One status poll: `GET {base}/v1beta/{name}`.
    pub(crate) async fn fetch_file(&self, name: &str) -> Result<FileRecord, SummarizeError> {
        let response = self
            .http
            .get(self.status_url(name))
            .send()
            .await
            .map_err(|e| SummarizeError::transport("file-status", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SummarizeError::transport("file-status", e))?;

        if !status.is_success() {
            return Err(SummarizeError::StatusPollFailed {
                status: status.as_u16(),
                message: error_body_message(&body, status.as_u16()),
            });
        }

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| SummarizeError::MalformedResponse {
                detail: format!("status body: {e}"),
            })?;
        unwrap_file_envelope(value).map_err(|e| SummarizeError::MalformedResponse {
            detail: format!("status shape: {e}"),
        })
    }

    // ── Strategy B: single generate with inline payload ───────────────────

    async fn summarize_inline(
        &self,
        doc: &DocumentHandle,
        config: &SummaryConfig,
    ) -> Result<(String, u32, u64, u64), SummarizeError> {
        let encoded = STANDARD.encode(doc.bytes());
        debug!("Inlined {} bytes as {} base64 chars", doc.len(), encoded.len());

        let request =
            GenerateRequest::with_inline_data(config.prompt_text(), doc.mime_type(), encoded);

        if let Some(ref cb) = config.progress_callback {
            cb.on_generate_start();
        }
        let generate_start = Instant::now();
        let response = self.generate(&request, config).await?;
        let generation_duration_ms = generate_start.elapsed().as_millis() as u64;

        let summary = extract_summary(&response)?;
        Ok((summary, 0, 0, generation_duration_ms))
    }

    /// `POST …:generateContent` and parse the response body.
    pub(crate) async fn generate(
        &self,
        request: &GenerateRequest,
        config: &SummaryConfig,
    ) -> Result<GenerateResponse, SummarizeError> {
        let response = self
            .http
            .post(self.generate_url(&config.model))
            .json(request)
            .send()
            .await
            .map_err(|e| SummarizeError::transport("generation", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SummarizeError::transport("generation", e))?;

        if !status.is_success() {
            return Err(SummarizeError::GenerationFailed {
                status: status.as_u16(),
                message: error_body_message(&body, status.as_u16()),
            });
        }

        serde_json::from_str(&body).map_err(|e| SummarizeError::MalformedResponse {
            detail: format!("generation body: {e}"),
        })
    }
}
