//! End-to-end worker tests against a fake generator.

use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use vidforge_genclient::{
    GenerateError, GenerateResult, GeneratedVideo, GenerationRequest, VideoGenerator,
};
use vidforge_store::ResultsStore;
use vidforge_worker::{run, SeedPolicy, WorkerConfig, WorkerContext};

/// In-memory generator: counts calls, fails on configured seeds.
struct FakeGenerator {
    calls: AtomicU32,
    fail_seeds: Vec<u32>,
}

impl FakeGenerator {
    fn new() -> Self {
        Self {
            calls: AtomicU32::new(0),
            fail_seeds: Vec::new(),
        }
    }

    fn failing_on(fail_seeds: Vec<u32>) -> Self {
        Self {
            calls: AtomicU32::new(0),
            fail_seeds,
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoGenerator for FakeGenerator {
    async fn generate(&self, request: &GenerationRequest) -> GenerateResult<GeneratedVideo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_seeds.contains(&request.seed) {
            return Err(GenerateError::GenerationFailed(format!(
                "simulated failure for seed {}",
                request.seed
            )));
        }
        Ok(GeneratedVideo {
            bytes: format!("video-seed-{}", request.seed).into_bytes(),
        })
    }
}

/// Write a prompt document with `n` assignments and matching tiny images.
fn write_fixture(dir: &Path, n: usize) {
    let mut entries = Vec::new();
    for i in 0..n {
        let image_path = dir.join(format!("frame_{}.png", i));
        image::RgbImage::new(4, 4)
            .save(&image_path)
            .expect("write fixture image");
        entries.push(format!(
            r#""{}": {{"image_prompt": "{}", "text_prompt": "p{}"}}"#,
            i,
            image_path.display(),
            i
        ));
    }
    std::fs::write(
        dir.join("prompts.json"),
        format!("{{{}}}", entries.join(",")),
    )
    .expect("write prompt document");
}

fn context(dir: &Path, k: u32, seeds: Vec<u32>, generator: Arc<FakeGenerator>) -> WorkerContext {
    let config = WorkerConfig {
        prompts_path: dir.join("prompts.json"),
        results_path: dir.join("results.json"),
        output_root: dir.join("outputs"),
        videos_per_group: k,
        ..WorkerConfig::default()
    };
    let seeds = SeedPolicy::fixed(seeds, k).unwrap();
    let store = ResultsStore::new(&config.results_path);
    WorkerContext {
        config,
        seeds,
        store,
        generator,
    }
}

#[tokio::test]
async fn test_fresh_run_generates_everything() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), 2);

    let generator = Arc::new(FakeGenerator::new());
    let ctx = context(dir.path(), 2, vec![1, 2], Arc::clone(&generator));

    let summary = run(&ctx, None, None).await.unwrap();
    assert_eq!(summary.groups_processed, 2);
    assert_eq!(summary.subjobs_generated, 4);
    assert_eq!(summary.subjobs_skipped, 0);
    assert_eq!(summary.subjobs_failed, 0);
    assert_eq!(generator.calls(), 4);

    let doc = ctx.store.load().unwrap();
    assert_eq!(doc.groups.len(), 2);
    assert_eq!(doc.groups[0].group_id, 1);
    assert_eq!(doc.groups[1].group_id, 2);
    for group in &doc.groups {
        let names: Vec<&str> = group.videos.iter().map(|v| v.video_name.as_str()).collect();
        assert_eq!(names, vec!["1.mp4", "2.mp4"]);
        assert_eq!(group.videos[0].seed, Some(1));
        assert_eq!(group.videos[1].seed, Some(2));
    }

    // Artifacts landed at {output_root}/{group_id}/{k}.mp4 with the fake
    // generator's payload.
    let artifact = dir.path().join("outputs/1/2.mp4");
    assert_eq!(std::fs::read(&artifact).unwrap(), b"video-seed-2");
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), 2);

    let generator = Arc::new(FakeGenerator::new());
    let ctx = context(dir.path(), 2, vec![1, 2], Arc::clone(&generator));

    run(&ctx, None, None).await.unwrap();
    let first = ctx.store.load().unwrap();
    assert_eq!(generator.calls(), 4);

    let summary = run(&ctx, None, None).await.unwrap();
    assert_eq!(generator.calls(), 4, "no additional generator calls");
    assert_eq!(summary.subjobs_generated, 0);
    assert_eq!(summary.subjobs_skipped, 4);

    let second = ctx.store.load().unwrap();
    assert_eq!(second, first, "results document unchanged by resume");
}

#[tokio::test]
async fn test_partial_failure_is_contained() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), 2);

    // Seed 20 drives sub-job 2 of every group; both groups lose exactly
    // that sub-job and the run still succeeds.
    let generator = Arc::new(FakeGenerator::failing_on(vec![20]));
    let ctx = context(dir.path(), 3, vec![10, 20, 30], Arc::clone(&generator));

    let summary = run(&ctx, None, None).await.unwrap();
    assert_eq!(summary.groups_processed, 2);
    assert_eq!(summary.subjobs_generated, 4);
    assert_eq!(summary.subjobs_failed, 2);

    let doc = ctx.store.load().unwrap();
    for group in &doc.groups {
        let names: Vec<&str> = group.videos.iter().map(|v| v.video_name.as_str()).collect();
        assert_eq!(names, vec!["1.mp4", "3.mp4"]);
    }

    // A later run retries only the missing sub-job.
    let retry_gen = Arc::new(FakeGenerator::new());
    let retry_ctx = context(dir.path(), 3, vec![10, 20, 30], Arc::clone(&retry_gen));
    let summary = run(&retry_ctx, None, None).await.unwrap();
    assert_eq!(retry_gen.calls(), 2);
    assert_eq!(summary.subjobs_generated, 2);
    assert_eq!(summary.subjobs_skipped, 4);

    let doc = retry_ctx.store.load().unwrap();
    for group in &doc.groups {
        assert_eq!(group.videos.len(), 3);
    }
}

#[tokio::test]
async fn test_missing_image_skips_group_and_leaves_store_untouched() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), 2);
    std::fs::remove_file(dir.path().join("frame_0.png")).unwrap();

    let generator = Arc::new(FakeGenerator::new());
    let ctx = context(dir.path(), 2, vec![1, 2], Arc::clone(&generator));

    let summary = run(&ctx, None, None).await.unwrap();
    assert_eq!(summary.groups_processed, 1);
    assert_eq!(generator.calls(), 2);

    let doc = ctx.store.load().unwrap();
    assert_eq!(doc.groups.len(), 1);
    assert_eq!(doc.groups[0].group_id, 2, "group 1 left absent for a retry");
}

#[tokio::test]
async fn test_disjoint_shards_share_one_document() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), 4);

    // Two worker invocations over disjoint ranges, same results document.
    let gen_a = Arc::new(FakeGenerator::new());
    let ctx_a = context(dir.path(), 1, vec![7], Arc::clone(&gen_a));
    run(&ctx_a, Some((0, 2)), None).await.unwrap();

    let gen_b = Arc::new(FakeGenerator::new());
    let ctx_b = context(dir.path(), 1, vec![7], Arc::clone(&gen_b));
    run(&ctx_b, Some((2, 4)), None).await.unwrap();

    let doc = ctx_b.store.load().unwrap();
    let ids: Vec<u64> = doc.groups.iter().map(|g| g.group_id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_max_groups_caps_the_run() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), 4);

    let generator = Arc::new(FakeGenerator::new());
    let ctx = context(dir.path(), 1, vec![7], Arc::clone(&generator));

    let summary = run(&ctx, None, Some(2)).await.unwrap();
    assert_eq!(summary.groups_processed, 2);
    assert_eq!(generator.calls(), 2);
}

#[tokio::test]
async fn test_invalid_shard_bounds_are_fatal() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), 2);

    let generator = Arc::new(FakeGenerator::new());
    let ctx = context(dir.path(), 1, vec![7], Arc::clone(&generator));

    assert!(run(&ctx, Some((1, 1)), None).await.is_err());
    assert!(run(&ctx, Some((0, 3)), None).await.is_err());
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_missing_prompt_document_is_fatal() {
    let dir = TempDir::new().unwrap();

    let generator = Arc::new(FakeGenerator::new());
    let ctx = context(dir.path(), 1, vec![7], Arc::clone(&generator));

    assert!(run(&ctx, None, None).await.is_err());
}
