//! The results store.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use vidforge_models::{GroupRecord, ResultsDocument};

use crate::error::{StoreError, StoreResult};
use crate::lock;
use crate::retry::SaveRetry;

/// What to do when the results document exists but cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    /// Warn and start from an empty document. Progress since the last good
    /// write is lost. This matches the historical behavior.
    #[default]
    Reset,
    /// Surface the parse failure as an error.
    Fail,
}

/// Concurrency-safe access to the shared results document.
///
/// Lock discipline: `load` holds a shared lock for the single read, `save`
/// an exclusive lock for the single write, and `commit_group` one exclusive
/// lock across the whole load-merge-save sequence. Locks live on a sidecar
/// `<path>.lock` file whose inode survives the atomic renames.
#[derive(Debug, Clone)]
pub struct ResultsStore {
    path: PathBuf,
    lock_path: PathBuf,
    policy: MalformedPolicy,
    retry: SaveRetry,
}

impl ResultsStore {
    /// Create a store for the document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let lock_path = lock_path_for(&path);
        Self {
            path,
            lock_path,
            policy: MalformedPolicy::default(),
            retry: SaveRetry::default(),
        }
    }

    /// Set the malformed-document policy.
    pub fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the save retry policy.
    pub fn with_retry(mut self, retry: SaveRetry) -> Self {
        self.retry = retry;
        self
    }

    /// Path of the canonical document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current document.
    ///
    /// A missing file is an empty document, never an error. Malformed
    /// content follows the configured [`MalformedPolicy`].
    pub fn load(&self) -> StoreResult<ResultsDocument> {
        let _guard = lock::lock_shared(&self.lock_path)?;
        self.read_unlocked()
    }

    /// Save the document: serialize to a `.tmp` sibling, then atomically
    /// rename over the canonical path. Readers never observe a partial
    /// write. Transient failures are retried with exponential backoff;
    /// exhaustion escalates.
    pub fn save(&self, document: &ResultsDocument) -> StoreResult<()> {
        self.retry.run("results save", || {
            let _guard = lock::lock_exclusive(&self.lock_path)?;
            self.write_unlocked(document)
        })
    }

    /// Merge one group record into the authoritative document and persist.
    ///
    /// The exclusive lock is held across the entire reload-upsert-save
    /// sequence, so two workers committing disjoint groups serialize
    /// instead of the second save discarding the first. Returns the merged
    /// document.
    pub fn commit_group(&self, record: &GroupRecord) -> StoreResult<ResultsDocument> {
        self.retry.run("results commit", || {
            let _guard = lock::lock_exclusive(&self.lock_path)?;
            let mut document = self.read_unlocked()?;
            document.upsert_group(record.clone());
            self.write_unlocked(&document)?;
            Ok(document)
        })
    }

    fn read_unlocked(&self) -> StoreResult<ResultsDocument> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No results document yet, starting empty");
                return Ok(ResultsDocument::empty());
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        match serde_json::from_str(&contents) {
            Ok(document) => Ok(document),
            Err(e) => match self.policy {
                MalformedPolicy::Reset => {
                    warn!(
                        path = %self.path.display(),
                        error = %e,
                        "Results document is malformed, starting fresh"
                    );
                    Ok(ResultsDocument::empty())
                }
                MalformedPolicy::Fail => Err(StoreError::malformed(&self.path, e.to_string())),
            },
        }
    }

    fn write_unlocked(&self, document: &ResultsDocument) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = staging_path_for(&self.path);
        let json = serde_json::to_string_pretty(document)
            .map_err(|e| StoreError::malformed(&self.path, e.to_string()))?;

        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            StoreError::Io(e)
        })?;

        debug!(
            path = %self.path.display(),
            groups = document.groups.len(),
            "Results document saved"
        );
        Ok(())
    }
}

fn lock_path_for(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".lock");
    PathBuf::from(os)
}

fn staging_path_for(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}
