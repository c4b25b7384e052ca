//! Shared data models for the vidforge batch generator.
//!
//! This crate provides Serde-serializable types for:
//! - The read-only prompt input document
//! - Work items (prompt key + global group id)
//! - The shared results document and its group/video records
//! - Sampling configuration forwarded to the generation sidecar

pub mod prompt;
pub mod record;
pub mod sampling;

// Re-export common types
pub use prompt::{PromptAssignment, PromptSet, WorkItem};
pub use record::{GroupRecord, ResultsDocument, VideoRecord};
pub use sampling::SamplingConfig;
