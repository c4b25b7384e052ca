//! Sidecar request/response types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use vidforge_models::SamplingConfig;

/// Request for one generation call.
///
/// The sidecar runs on the same host, so the reference image travels as a
/// path; the orchestrator has already decoded it once to validate it and
/// obtain dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Generation instruction
    pub text_prompt: String,
    /// Path to the reference still image
    pub image_path: PathBuf,
    /// Decoded image width
    pub image_width: u32,
    /// Decoded image height
    pub image_height: u32,
    /// Seed for this sub-job
    pub seed: u32,
    /// Sampling parameters, forwarded verbatim
    pub sampling: SamplingConfig,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub model: Option<String>,
}

/// One-time model load request, sent before the first generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadModelRequest {
    /// Device to bind, e.g. "cuda:0" or "cpu"
    pub device: String,
}
