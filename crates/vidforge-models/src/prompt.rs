//! Prompt input document types.
//!
//! The prompt document is produced by the upstream prompt-generation stage
//! and is read-only to this system. It maps string keys to assignments:
//!
//! ```json
//! { "0": { "image_prompt": "frames/0.jpg", "text_prompt": "..." }, ... }
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One work item from the prompt document: a reference still image plus the
/// generation instruction for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PromptAssignment {
    /// Path to the reference still image
    pub image_prompt: PathBuf,
    /// Generation instruction
    pub text_prompt: String,
}

/// The full prompt document, keyed by string-sortable ordinal keys.
///
/// A `BTreeMap` keeps iteration in sorted key order, which is the global
/// execution order every worker agrees on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct PromptSet(pub BTreeMap<String, PromptAssignment>);

/// A prompt key paired with its global group id.
///
/// `group_id` is the 1-based position of the key in the full sorted key
/// order, assigned before any sharding so that workers operating on disjoint
/// shards can never collide on an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WorkItem {
    pub group_id: u64,
    pub key: String,
}

impl PromptSet {
    /// Number of assignments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the document holds no assignments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up one assignment by key.
    pub fn get(&self, key: &str) -> Option<&PromptAssignment> {
        self.0.get(key)
    }

    /// All keys in sorted order, each paired with its global group id.
    pub fn work_items(&self) -> Vec<WorkItem> {
        self.0
            .keys()
            .enumerate()
            .map(|(index, key)| WorkItem {
                group_id: index as u64 + 1,
                key: key.clone(),
            })
            .collect()
    }
}
