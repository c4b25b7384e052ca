//! Worker error types.

use std::path::PathBuf;

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Reference image not found for group {group_id}: {path}")]
    MissingImage { group_id: u64, path: PathBuf },

    #[error("Could not load reference image for group {group_id} ({path}): {message}")]
    ImageUnreadable {
        group_id: u64,
        path: PathBuf,
        message: String,
    },

    #[error("Store error: {0}")]
    Store(#[from] vidforge_store::StoreError),

    #[error("Generation error: {0}")]
    Generate(#[from] vidforge_genclient::GenerateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Group-level failures skip the group and leave its prior state
    /// untouched; everything else aborts the worker.
    pub fn is_group_recoverable(&self) -> bool {
        matches!(
            self,
            WorkerError::MissingImage { .. } | WorkerError::ImageUnreadable { .. }
        )
    }
}
