//! Client for the image-to-video generation sidecar.
//!
//! The generative model runs out of process as a per-GPU sidecar service.
//! This crate defines the [`VideoGenerator`] contract the orchestrator
//! depends on, plus the HTTP implementation against the sidecar.

pub mod client;
pub mod error;
pub mod generator;
pub mod types;

pub use client::{SidecarClient, SidecarConfig};
pub use error::{GenerateError, GenerateResult};
pub use generator::{GeneratedVideo, VideoGenerator};
pub use types::{GenerationRequest, LoadModelRequest};
