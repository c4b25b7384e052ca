//! The generator contract.

use async_trait::async_trait;

use crate::error::GenerateResult;
use crate::types::GenerationRequest;

/// One generated artifact, ready to be persisted by the caller.
#[derive(Debug, Clone)]
pub struct GeneratedVideo {
    /// Encoded video bytes
    pub bytes: Vec<u8>,
}

impl GeneratedVideo {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// The external generation collaborator.
///
/// Implementations may take minutes per call and hold an entire accelerator
/// for the duration. There is deliberately no timeout or cancellation in
/// this contract: a hung generation blocks its worker.
#[async_trait]
pub trait VideoGenerator: Send + Sync {
    /// Produce one artifact for the request, or a typed failure.
    async fn generate(&self, request: &GenerationRequest) -> GenerateResult<GeneratedVideo>;
}
