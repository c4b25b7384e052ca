//! Generation client error types.

use thiserror::Error;

pub type GenerateResult<T> = Result<T, GenerateError>;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Generation sidecar unavailable: {0}")]
    ServiceUnavailable(String),

    /// The model accepted the request and failed to produce an artifact.
    /// Not retryable at the transport level; the sub-job is simply skipped
    /// until a future run retries it.
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenerateError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerateError::ServiceUnavailable(_) | GenerateError::Network(_)
        )
    }
}
