//! Command-line surface.

use std::path::PathBuf;

use clap::Parser;

/// Batch image-to-video generation worker.
///
/// Runs one shard of the prompt set against one accelerator, persisting
/// progress to the shared results document. Exit code is 0 on completion
/// even when individual sub-jobs failed; non-zero only for fatal startup
/// errors.
#[derive(Parser, Debug, Default)]
#[command(name = "vidforge-worker", version, about)]
pub struct Args {
    /// First index of this worker's shard in the full sorted order (inclusive)
    #[arg(long, requires = "end")]
    pub start: Option<usize>,

    /// One-past-last index of this worker's shard
    #[arg(long, requires = "start")]
    pub end: Option<usize>,

    /// Explicit CUDA device index, skipping free-memory selection
    #[arg(long)]
    pub device: Option<u32>,

    /// Process at most this many groups from the front of the full order
    #[arg(long, conflicts_with_all = ["start", "end"])]
    pub max_groups: Option<usize>,

    /// Sub-jobs per group
    #[arg(long)]
    pub k: Option<u32>,

    /// Comma-separated fixed seed list; omit for random seeds
    #[arg(long, value_delimiter = ',')]
    pub seeds: Option<Vec<u32>>,

    /// Path to the prompt document
    #[arg(long)]
    pub prompts: Option<PathBuf>,

    /// Path to the shared results document
    #[arg(long)]
    pub results: Option<PathBuf>,

    /// Root directory for generated artifacts
    #[arg(long)]
    pub output_root: Option<PathBuf>,

    /// Fail on a malformed results document instead of resetting it
    #[arg(long)]
    pub strict_results: bool,
}

impl Args {
    /// The shard range, present only when both bounds were given.
    pub fn range(&self) -> Option<(usize, usize)> {
        self.start.zip(self.end)
    }
}
