//! Input resolution: normalise a user-supplied path or URL to a [`DocumentHandle`].
//!
//! The bytes stay in memory; they are uploaded (or inlined) as-is, never
//! handed to a local parser. We validate the PDF magic bytes (`%PDF`) before
//! returning so callers get a meaningful error instead of a service-side
//! rejection after a multi-megabyte upload.

use crate::document::{DocumentHandle, PDF_MIME};
use crate::error::SummarizeError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to an in-memory PDF document.
///
/// If the input is a URL, download it. If it is a local file, validate it
/// exists and is readable. Either way the `%PDF` magic bytes are checked.
pub async fn resolve_input(
    input: &str,
    timeout_secs: u64,
) -> Result<DocumentHandle, SummarizeError> {
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        read_local(input).await
    }
}

/// Read a local file, validating existence, permissions, and magic bytes.
async fn read_local(path_str: &str) -> Result<DocumentHandle, SummarizeError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(SummarizeError::FileNotFound { path });
    }

    let bytes = match tokio::fs::read(&path).await {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(SummarizeError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(SummarizeError::FileNotFound { path });
        }
    };

    check_magic(&bytes, &path)?;

    let display_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "document.pdf".to_string());

    debug!("Resolved local PDF: {} ({} bytes)", path.display(), bytes.len());
    Ok(DocumentHandle::new(display_name, PDF_MIME, bytes))
}

/// Download a URL into memory and wrap it as a document.
async fn download_url(url: &str, timeout_secs: u64) -> Result<DocumentHandle, SummarizeError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| SummarizeError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            SummarizeError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            SummarizeError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(SummarizeError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| SummarizeError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?
        .to_vec();

    check_magic(&bytes, Path::new(url))?;

    let display_name = extract_filename(url);
    info!("Downloaded {} bytes as '{}'", bytes.len(), display_name);

    Ok(DocumentHandle::new(display_name, PDF_MIME, bytes))
}

/// Verify the `%PDF` magic bytes.
fn check_magic(bytes: &[u8], path: &Path) -> Result<(), SummarizeError> {
    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        let n = bytes.len().min(4);
        magic[..n].copy_from_slice(&bytes[..n]);
        return Err(SummarizeError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }
    Ok(())
}

/// Extract a reasonable filename from the URL path.
fn extract_filename(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() && last.contains('.') {
                    return last.to_string();
                }
            }
        }
    }

    "downloaded.pdf".to_string()
}
