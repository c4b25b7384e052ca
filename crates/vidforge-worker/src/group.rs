//! Group execution.
//!
//! One group is one reference image plus prompt, realized as up to K video
//! artifacts at `{output_root}/{group_id}/{k}.{ext}`. Sub-jobs that already
//! exist on disk are skipped, so re-running a worker over the same shard is
//! an idempotent resume. A sub-job failure never aborts the group, and a
//! group failure never aborts the worker.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use vidforge_genclient::GenerationRequest;
use vidforge_models::{GroupRecord, PromptAssignment, VideoRecord, WorkItem};

use crate::error::WorkerResult;
use crate::image::load_reference_image;
use crate::logging::GroupLogger;
use crate::runner::WorkerContext;

/// Per-group counters, aggregated into the run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupOutcome {
    pub generated: u32,
    pub skipped: u32,
    pub failed: u32,
}

/// Run one group to completion.
///
/// Persistence is the strict variant: the group record is committed after
/// every successful generation, and reconciled against the authoritative
/// document once more when the group finishes (which also records artifacts
/// discovered on disk during skip scans).
pub async fn process_group(
    ctx: &WorkerContext,
    item: &WorkItem,
    assignment: &PromptAssignment,
) -> WorkerResult<GroupOutcome> {
    let logger = GroupLogger::new(item.group_id, &item.key);
    let k_total = ctx.config.videos_per_group;

    // The reference image is decoded once and reused for all K sub-jobs.
    // Missing or undecodable images are group-level errors: the caller
    // skips the group and the results document is left untouched.
    let image = load_reference_image(item.group_id, &assignment.image_prompt)?;
    logger.log_start(&format!(
        "image {} ({}x{}), {} sub-jobs",
        image.path.display(),
        image.width,
        image.height,
        k_total
    ));

    let group_dir = ctx.config.output_root.join(item.group_id.to_string());
    tokio::fs::create_dir_all(&group_dir).await?;

    // Start from the authoritative record for this group, if any, so
    // previously realized sub-jobs survive the merge.
    let mut record = GroupRecord::new(
        item.group_id,
        &assignment.image_prompt,
        &assignment.text_prompt,
    );
    let authoritative = ctx.store.load()?;
    if let Some(prior) = authoritative.group(item.group_id) {
        record.videos = prior.videos.clone();
    }

    let mut outcome = GroupOutcome::default();

    for k in 1..=k_total {
        let video_name = format!("{}.{}", k, ctx.config.video_ext);
        let out_path = group_dir.join(&video_name);
        let rel_path = PathBuf::from(item.group_id.to_string()).join(&video_name);

        let on_disk = out_path.exists();
        let recorded_present = record.videos.iter().any(|v| {
            v.video_name == video_name && ctx.config.output_root.join(&v.video_path).exists()
        });

        if on_disk || recorded_present {
            debug!(
                group_id = item.group_id,
                sub_job = k,
                "Artifact already exists, skipping"
            );
            // Discovered-on-disk artifacts get a seedless record; existing
            // records are kept as they are.
            if !record.has_video(&video_name) {
                record.record_video(VideoRecord {
                    video_name,
                    video_path: rel_path,
                    seed: None,
                });
            }
            outcome.skipped += 1;
            continue;
        }

        let seed = ctx.seeds.seed_for(k);
        let request = GenerationRequest {
            text_prompt: assignment.text_prompt.clone(),
            image_path: image.path.clone(),
            image_width: image.width,
            image_height: image.height,
            seed,
            sampling: ctx.config.sampling.clone(),
        };

        logger.log_progress(&format!("generating sub-job {}/{} (seed {})", k, k_total, seed));

        let video = match ctx.generator.generate(&request).await {
            Ok(video) => video,
            Err(e) => {
                // Transient buffers from the failed attempt drop here; the
                // group carries on with the next sub-job.
                logger.log_error(&format!("sub-job {}/{} failed: {}", k, k_total, e));
                outcome.failed += 1;
                continue;
            }
        };

        if let Err(e) = write_artifact(&out_path, &video.bytes).await {
            logger.log_error(&format!(
                "sub-job {}/{} could not be persisted to {}: {}",
                k,
                k_total,
                out_path.display(),
                e
            ));
            outcome.failed += 1;
            continue;
        }

        debug!(
            group_id = item.group_id,
            sub_job = k,
            bytes = video.bytes.len(),
            path = %out_path.display(),
            "Artifact saved"
        );

        record.record_video(VideoRecord {
            video_name,
            video_path: rel_path,
            seed: Some(seed),
        });
        ctx.store.commit_group(&record)?;
        outcome.generated += 1;
    }

    // Reconcile once more against the authoritative document; skip-only
    // passes reach the store here.
    ctx.store.commit_group(&record)?;

    logger.log_completion(&format!(
        "{} generated, {} skipped, {} failed",
        outcome.generated, outcome.skipped, outcome.failed
    ));
    Ok(outcome)
}

/// Write artifact bytes through a `.tmp` sibling and atomic rename, the same
/// discipline the results document uses: a crash mid-write never leaves a
/// half-written artifact that a later run would skip as complete.
async fn write_artifact(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp_path = path.with_extension("tmp");

    tokio::fs::write(&tmp_path, bytes).await?;
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        if let Err(cleanup) = tokio::fs::remove_file(&tmp_path).await {
            warn!(
                path = %tmp_path.display(),
                error = %cleanup,
                "Failed to remove staging artifact"
            );
        }
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_artifact_is_staged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("1.mp4");

        write_artifact(&path, b"video bytes").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"video bytes");
        assert!(!dir.path().join("1.tmp").exists());
    }

    #[tokio::test]
    async fn test_write_artifact_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("1.mp4");

        write_artifact(&path, b"old").await.unwrap();
        write_artifact(&path, b"new").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }
}
