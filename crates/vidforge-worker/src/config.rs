//! Worker configuration.
//!
//! Environment variables carry deployment defaults; CLI flags override them
//! per invocation (see [`crate::cli`]).

use std::path::PathBuf;

use vidforge_models::SamplingConfig;

use crate::cli::Args;

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Path to the read-only prompt document
    pub prompts_path: PathBuf,
    /// Path to the shared results document
    pub results_path: PathBuf,
    /// Root directory for generated artifacts (`{output_root}/{group_id}/{k}.{ext}`)
    pub output_root: PathBuf,
    /// Sub-jobs per group (K)
    pub videos_per_group: u32,
    /// Artifact extension
    pub video_ext: String,
    /// Fixed seed list; `None` selects random seed mode
    pub fixed_seeds: Option<Vec<u32>>,
    /// Fail on a malformed results document instead of resetting it
    pub strict_results: bool,
    /// Sampling parameters forwarded to the sidecar
    pub sampling: SamplingConfig,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            prompts_path: PathBuf::from("generated_prompts.json"),
            results_path: PathBuf::from("generation_results.json"),
            output_root: PathBuf::from("outputs"),
            videos_per_group: 3,
            video_ext: "mp4".to_string(),
            fixed_seeds: None,
            strict_results: false,
            sampling: SamplingConfig::default(),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let sampling_defaults = SamplingConfig::default();

        Self {
            prompts_path: std::env::var("PROMPTS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.prompts_path),
            results_path: std::env::var("RESULTS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.results_path),
            output_root: std::env::var("OUTPUT_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_root),
            videos_per_group: std::env::var("VIDEOS_PER_GROUP")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.videos_per_group),
            video_ext: std::env::var("VIDEO_EXT").unwrap_or(defaults.video_ext),
            fixed_seeds: std::env::var("FIXED_SEEDS").ok().map(parse_seed_list),
            strict_results: std::env::var("STRICT_RESULTS")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            sampling: SamplingConfig {
                num_frames: env_parsed("NUM_FRAMES", sampling_defaults.num_frames),
                num_inference_steps: env_parsed(
                    "NUM_INFERENCE_STEPS",
                    sampling_defaults.num_inference_steps,
                ),
                guidance_scale: env_parsed("GUIDANCE_SCALE", sampling_defaults.guidance_scale),
                shift: env_parsed("SAMPLE_SHIFT", sampling_defaults.shift),
                sample_solver: std::env::var("SAMPLE_SOLVER")
                    .unwrap_or(sampling_defaults.sample_solver),
                width: env_parsed("VIDEO_WIDTH", sampling_defaults.width),
                height: env_parsed("VIDEO_HEIGHT", sampling_defaults.height),
                fps: env_parsed("VIDEO_FPS", sampling_defaults.fps),
                negative_prompt: std::env::var("NEGATIVE_PROMPT").unwrap_or_default(),
            },
        }
    }

    /// Apply CLI overrides on top of the env-derived config.
    pub fn merged_with(mut self, args: &Args) -> Self {
        if let Some(prompts) = &args.prompts {
            self.prompts_path = prompts.clone();
        }
        if let Some(results) = &args.results {
            self.results_path = results.clone();
        }
        if let Some(output_root) = &args.output_root {
            self.output_root = output_root.clone();
        }
        if let Some(k) = args.k {
            self.videos_per_group = k;
        }
        if let Some(seeds) = &args.seeds {
            self.fixed_seeds = Some(seeds.clone());
        }
        if args.strict_results {
            self.strict_results = true;
        }
        self
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn parse_seed_list(raw: String) -> Vec<u32> {
    raw.split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect()
}
