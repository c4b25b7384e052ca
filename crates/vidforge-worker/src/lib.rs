//! Batch image-to-video generation worker.
//!
//! This crate provides:
//! - The CLI surface and env-backed configuration
//! - Device selection (explicit override, visibility restriction, or
//!   free-memory ranking)
//! - Seed assignment policy (fixed list or random)
//! - Work partitioning over the full sorted prompt order
//! - The per-group execution state machine with idempotent resume
//! - The orchestrator loop and run summary

pub mod cli;
pub mod config;
pub mod device;
pub mod error;
pub mod group;
pub mod image;
pub mod logging;
pub mod partition;
pub mod runner;
pub mod seed;

pub use cli::Args;
pub use config::WorkerConfig;
pub use device::{select_device, DeviceId};
pub use error::{WorkerError, WorkerResult};
pub use group::{process_group, GroupOutcome};
pub use image::{load_reference_image, LoadedImage};
pub use logging::GroupLogger;
pub use partition::partition;
pub use runner::{run, RunSummary, WorkerContext};
pub use seed::SeedPolicy;
