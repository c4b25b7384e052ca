//! Seed assignment policy.

use rand::Rng;

use crate::error::{WorkerError, WorkerResult};

/// How seeds are assigned to the K sub-jobs of a group.
#[derive(Debug, Clone)]
pub enum SeedPolicy {
    /// `seed_for(k)` returns `seeds[k-1]`, every time, regardless of call
    /// order or prior state.
    Fixed(Vec<u32>),
    /// A fresh u32 per call. No cross-run reproducibility is guaranteed.
    Random,
}

impl SeedPolicy {
    /// Fixed-list policy. The list must cover every sub-job index up front
    /// so `seed_for` is infallible afterward.
    pub fn fixed(seeds: Vec<u32>, videos_per_group: u32) -> WorkerResult<Self> {
        if (seeds.len() as u32) < videos_per_group {
            return Err(WorkerError::config_error(format!(
                "fixed seed list has {} entries but {} sub-jobs per group are configured",
                seeds.len(),
                videos_per_group
            )));
        }
        Ok(Self::Fixed(seeds))
    }

    /// Random policy.
    pub fn random() -> Self {
        Self::Random
    }

    /// Build from an optional fixed list, as configuration supplies it.
    pub fn from_config(fixed_seeds: Option<Vec<u32>>, videos_per_group: u32) -> WorkerResult<Self> {
        match fixed_seeds {
            Some(seeds) => Self::fixed(seeds, videos_per_group),
            None => Ok(Self::random()),
        }
    }

    /// Seed for sub-job `k` (1-indexed).
    pub fn seed_for(&self, k: u32) -> u32 {
        match self {
            SeedPolicy::Fixed(seeds) => seeds[(k - 1) as usize],
            SeedPolicy::Random => rand::rng().random(),
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, SeedPolicy::Fixed(_))
    }
}
