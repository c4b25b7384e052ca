//! Sampling configuration forwarded to the generation sidecar.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Sampling parameters for one generation call.
///
/// This is an opaque bag from the orchestrator's point of view: values are
/// forwarded to the sidecar verbatim. In particular `num_frames` must satisfy
/// the model's 4n+1 constraint, which the sidecar enforces, not us.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SamplingConfig {
    /// Frames per video (model requires 4n+1)
    pub num_frames: u32,
    /// Denoising steps
    pub num_inference_steps: u32,
    /// Classifier-free guidance scale
    pub guidance_scale: f64,
    /// Flow-matching shift
    pub shift: f64,
    /// Solver name, e.g. "unipc"
    pub sample_solver: String,
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Output frame rate
    pub fps: u32,
    /// Negative prompt, empty to disable
    #[serde(default)]
    pub negative_prompt: String,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            num_frames: 49,
            num_inference_steps: 50,
            guidance_scale: 6.0,
            shift: 5.0,
            sample_solver: "unipc".to_string(),
            width: 1280,
            height: 704,
            fps: 24,
            negative_prompt: String::new(),
        }
    }
}
