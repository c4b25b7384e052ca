//! Batch generation worker binary.

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

use vidforge_genclient::SidecarClient;
use vidforge_store::{MalformedPolicy, ResultsStore};
use vidforge_worker::{select_device, Args, SeedPolicy, WorkerConfig, WorkerContext};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("vidforge_worker=info".parse().unwrap())
        .add_directive("vidforge_store=info".parse().unwrap())
        .add_directive("vidforge_genclient=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let worker_id = format!("worker-{}", Uuid::new_v4());
    info!("Starting vidforge-worker {}", worker_id);

    let config = WorkerConfig::from_env().merged_with(&args);
    info!("Worker config: {:?}", config);

    // Seed policy is pure configuration; reject bad configs before touching
    // anything else.
    let seeds = match SeedPolicy::from_config(config.fixed_seeds.clone(), config.videos_per_group) {
        Ok(seeds) => seeds,
        Err(e) => {
            error!("Invalid seed configuration: {}", e);
            std::process::exit(2);
        }
    };

    // Bind one device for the lifetime of this process.
    let device = select_device(args.device);
    info!(device = %device, "Bound execution device");

    // The sidecar owns the model; make it load on our device before any
    // group starts.
    let generator = match SidecarClient::from_env() {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create sidecar client: {}", e);
            std::process::exit(1);
        }
    };

    if !generator.healthy().await {
        error!("Generation sidecar is not reachable; aborting before any work");
        std::process::exit(1);
    }

    if let Err(e) = generator.load_model(&device.to_string()).await {
        error!("Sidecar failed to load its model on {}: {}", device, e);
        std::process::exit(1);
    }

    let policy = if config.strict_results {
        MalformedPolicy::Fail
    } else {
        MalformedPolicy::Reset
    };
    let store = ResultsStore::new(&config.results_path).with_policy(policy);

    let range = args.range();
    let max_groups = args.max_groups;
    let ctx = WorkerContext {
        config,
        seeds,
        store,
        generator: Arc::new(generator),
    };

    match vidforge_worker::run(&ctx, range, max_groups).await {
        Ok(summary) => {
            info!(
                groups_processed = summary.groups_processed,
                subjobs_generated = summary.subjobs_generated,
                subjobs_skipped = summary.subjobs_skipped,
                subjobs_failed = summary.subjobs_failed,
                "Worker finished"
            );
        }
        Err(e) => {
            error!("Fatal worker error: {}", e);
            std::process::exit(1);
        }
    }
}
