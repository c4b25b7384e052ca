//! Work partitioning.
//!
//! Every worker sees the same full sorted work-item list (group ids already
//! assigned from the full order by `PromptSet::work_items`); this module
//! only slices out the contiguous range one invocation is responsible for.

use vidforge_models::WorkItem;

use crate::error::{WorkerError, WorkerResult};

/// Resolve the sub-sequence of `items` this worker owns.
///
/// With `range = Some((start, end))` the half-open shard `[start, end)` is
/// returned; bounds outside the item list are a configuration error. With
/// no range, all items are returned, or the `max_groups` prefix when set.
pub fn partition(
    items: &[WorkItem],
    range: Option<(usize, usize)>,
    max_groups: Option<usize>,
) -> WorkerResult<Vec<WorkItem>> {
    match range {
        Some((start, end)) => {
            if start >= end {
                return Err(WorkerError::config_error(format!(
                    "invalid shard range: start {} must be below end {}",
                    start, end
                )));
            }
            if end > items.len() {
                return Err(WorkerError::config_error(format!(
                    "shard range [{}, {}) exceeds the {} available groups",
                    start,
                    end,
                    items.len()
                )));
            }
            Ok(items[start..end].to_vec())
        }
        None => match max_groups {
            Some(cap) => Ok(items.iter().take(cap).cloned().collect()),
            None => Ok(items.to_vec()),
        },
    }
}
