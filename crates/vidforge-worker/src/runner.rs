//! Orchestrator loop.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use vidforge_genclient::VideoGenerator;
use vidforge_store::{load_prompt_set, ResultsStore};

use crate::config::WorkerConfig;
use crate::error::WorkerResult;
use crate::group::process_group;
use crate::partition::partition;
use crate::seed::SeedPolicy;

/// Everything a group execution needs, built once at startup.
pub struct WorkerContext {
    pub config: WorkerConfig,
    pub seeds: SeedPolicy,
    pub store: ResultsStore,
    pub generator: Arc<dyn VideoGenerator>,
}

/// Counters for one worker run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub groups_processed: u64,
    pub subjobs_generated: u64,
    pub subjobs_skipped: u64,
    pub subjobs_failed: u64,
}

/// Process this worker's shard of the prompt set.
///
/// Per-sub-job and per-group failures are counted and logged, never fatal.
/// The error path is reserved for startup problems (missing or malformed
/// prompt document, invalid shard bounds) and for persistence failures that
/// survived their retries.
pub async fn run(
    ctx: &WorkerContext,
    range: Option<(usize, usize)>,
    max_groups: Option<usize>,
) -> WorkerResult<RunSummary> {
    let started = Utc::now();

    let prompts = load_prompt_set(&ctx.config.prompts_path)?;
    let items = prompts.work_items();
    let shard = partition(&items, range, max_groups)?;

    info!(
        total_groups = items.len(),
        shard_groups = shard.len(),
        k = ctx.config.videos_per_group,
        fixed_seeds = ctx.seeds.is_fixed(),
        "Worker shard resolved"
    );

    let mut summary = RunSummary::default();

    for item in &shard {
        let Some(assignment) = prompts.get(&item.key) else {
            continue;
        };

        match process_group(ctx, item, assignment).await {
            Ok(outcome) => {
                summary.groups_processed += 1;
                summary.subjobs_generated += u64::from(outcome.generated);
                summary.subjobs_skipped += u64::from(outcome.skipped);
                summary.subjobs_failed += u64::from(outcome.failed);
            }
            Err(e) if e.is_group_recoverable() => {
                error!(group_id = item.group_id, error = %e, "Skipping group");
            }
            Err(e) => return Err(e),
        }
    }

    let elapsed = Utc::now() - started;
    info!(
        groups_processed = summary.groups_processed,
        subjobs_generated = summary.subjobs_generated,
        subjobs_skipped = summary.subjobs_skipped,
        subjobs_failed = summary.subjobs_failed,
        elapsed_secs = elapsed.num_seconds(),
        "Run complete"
    );

    Ok(summary)
}
