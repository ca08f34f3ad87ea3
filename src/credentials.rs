//! Persistent storage for the last-used API credential.
//!
//! A deliberately small key-value capability: load one string, save one
//! string, clear it. The library core never reads or writes credentials;
//! only the presentation layer (the CLI binary) does, so a saved key
//! survives across invocations the way a browser keeps one in local
//! storage. Explicit init (call [`CredentialStore::load`]), no implicit
//! teardown.

use crate::error::SummarizeError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Capability interface for credential persistence.
///
/// Injected into the presentation layer so tests (and alternative front
/// ends) can substitute their own storage.
pub trait CredentialStore {
    /// Load the stored credential, if any was ever saved.
    fn load(&self) -> Result<Option<String>, SummarizeError>;

    /// Persist the credential, replacing any previous value.
    fn save(&self, api_key: &str) -> Result<(), SummarizeError>;

    /// Remove the stored credential. A no-op if none exists.
    fn clear(&self) -> Result<(), SummarizeError>;
}

/// File-backed store: one key in one file under the user config directory.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Store at the conventional per-user location
    /// (`{config_dir}/pdfsum/api_key`).
    pub fn default_location() -> Result<Self, SummarizeError> {
        let base = dirs::config_dir().ok_or_else(|| {
            SummarizeError::Internal("could not determine the user config directory".into())
        })?;
        Ok(Self {
            path: base.join("pdfsum").join("api_key"),
        })
    }

    /// Store at an explicit path (used by tests).
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn store_error(&self, detail: impl std::fmt::Display) -> SummarizeError {
        SummarizeError::CredentialStore {
            path: self.path.clone(),
            detail: detail.to_string(),
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<String>, SummarizeError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let key = contents.trim().to_string();
                if key.is_empty() {
                    Ok(None)
                } else {
                    debug!("Loaded stored credential from {}", self.path.display());
                    Ok(Some(key))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.store_error(e)),
        }
    }

    fn save(&self, api_key: &str) -> Result<(), SummarizeError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.store_error(e))?;
        }
        fs::write(&self.path, api_key.trim()).map_err(|e| self.store_error(e))?;

        // Keep the credential private on unix-likes.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.path, perms).map_err(|e| self.store_error(e))?;
        }

        debug!("Saved credential to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), SummarizeError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.store_error(e)),
        }
    }
}
