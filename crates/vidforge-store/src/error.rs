//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed results document at {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("Input document not found: {0}")]
    InputMissing(PathBuf),

    #[error("Malformed input document at {path}: {message}")]
    InputMalformed { path: PathBuf, message: String },

    #[error("Save failed after {attempts} attempts: {last_error}")]
    RetryExhausted { attempts: u32, last_error: String },
}

impl StoreError {
    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if the error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Io(_))
    }
}
