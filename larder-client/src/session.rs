//! Persistent session storage.
//!
//! The bearer token lives in a single plain-text file; absence means logged
//! out. The file is re-read on every token access rather than cached, so a
//! clear performed elsewhere (another process, the 401 handler) is observed
//! on the next facade call.

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Handle to the persisted session token. Cloning shares the same backing
/// file; there is no in-memory copy here.
#[derive(Debug, Clone)]
pub struct Session {
    path: PathBuf,
}

impl Session {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current token, or `None` when logged out. An unreadable or empty
    /// file counts as logged out.
    pub fn token(&self) -> Option<String> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        let token = contents.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    pub fn store(&self, token: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;
        Ok(())
    }

    /// Remove the persisted token. Clearing an already-cleared session is a
    /// no-op.
    pub fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
