//! Structured group logging.
//!
//! Wraps tracing with consistent per-group fields so the multi-worker logs
//! stay greppable by group id.

use tracing::{error, info, warn};

/// Logger for one group's lifecycle.
#[derive(Debug, Clone)]
pub struct GroupLogger {
    group_id: u64,
    key: String,
}

impl GroupLogger {
    pub fn new(group_id: u64, key: &str) -> Self {
        Self {
            group_id,
            key: key.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(group_id = self.group_id, key = %self.key, "Group started: {}", message);
    }

    pub fn log_progress(&self, message: &str) {
        info!(group_id = self.group_id, key = %self.key, "Group progress: {}", message);
    }

    pub fn log_warning(&self, message: &str) {
        warn!(group_id = self.group_id, key = %self.key, "Group warning: {}", message);
    }

    pub fn log_error(&self, message: &str) {
        error!(group_id = self.group_id, key = %self.key, "Group error: {}", message);
    }

    pub fn log_completion(&self, message: &str) {
        info!(group_id = self.group_id, key = %self.key, "Group completed: {}", message);
    }

    pub fn group_id(&self) -> u64 {
        self.group_id
    }
}
