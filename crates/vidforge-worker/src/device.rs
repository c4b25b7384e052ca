//! Device selection.
//!
//! A worker binds to exactly one accelerator for its lifetime, before any
//! generation begins; there is no mid-run rebalancing. NVML initialisation
//! is gracefully optional: hosts without NVIDIA drivers fall back to CPU
//! instead of panicking.

use std::fmt;

use nvml_wrapper::Nvml;
use tracing::{info, warn};

/// The device a worker is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceId {
    Cuda(u32),
    Cpu,
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceId::Cuda(index) => write!(f, "cuda:{}", index),
            DeviceId::Cpu => write!(f, "cpu"),
        }
    }
}

/// Select the device to bind, in priority order:
/// 1. an explicit override, returned unchanged;
/// 2. the first visible device when `CUDA_VISIBLE_DEVICES` already
///    restricts enumeration (indices are relative to the restriction);
/// 3. the device with the most free memory, ties to the lowest index;
/// 4. CPU when nothing is available.
pub fn select_device(explicit: Option<u32>) -> DeviceId {
    if let Some(index) = explicit {
        return DeviceId::Cuda(index);
    }

    if visibility_restricted() {
        info!("CUDA_VISIBLE_DEVICES is set, binding first visible device");
        return DeviceId::Cuda(0);
    }

    let nvml = match Nvml::init() {
        Ok(nvml) => nvml,
        Err(e) => {
            warn!(error = %e, "NVML unavailable, falling back to CPU");
            return DeviceId::Cpu;
        }
    };

    match pick_most_free(&free_memory_by_device(&nvml)) {
        Some(index) => DeviceId::Cuda(index),
        None => {
            warn!("No usable GPU found, falling back to CPU");
            DeviceId::Cpu
        }
    }
}

fn visibility_restricted() -> bool {
    std::env::var("CUDA_VISIBLE_DEVICES")
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false)
}

/// Free memory per enumerable device. Devices that fail to report are
/// skipped rather than failing the whole scan.
fn free_memory_by_device(nvml: &Nvml) -> Vec<(u32, u64)> {
    let device_count = match nvml.device_count() {
        Ok(n) => n,
        Err(e) => {
            warn!(error = %e, "Failed to query GPU device count");
            return Vec::new();
        }
    };

    let mut free = Vec::with_capacity(device_count as usize);
    for index in 0..device_count {
        let mem = nvml
            .device_by_index(index)
            .and_then(|device| device.memory_info());
        match mem {
            Ok(mem) => free.push((index, mem.free)),
            Err(e) => {
                warn!(gpu_index = index, error = %e, "Skipping GPU, memory query failed");
            }
        }
    }
    free
}

/// Index with the greatest free memory; ties break to the lowest index.
fn pick_most_free(free: &[(u32, u64)]) -> Option<u32> {
    free.iter()
        .max_by(|(a_idx, a_free), (b_idx, b_free)| {
            a_free.cmp(b_free).then(b_idx.cmp(a_idx))
        })
        .map(|(index, _)| *index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_override_wins() {
        assert_eq!(select_device(Some(3)), DeviceId::Cuda(3));
    }

    #[test]
    fn test_pick_most_free() {
        let free = vec![(0, 4_000), (1, 16_000), (2, 8_000)];
        assert_eq!(pick_most_free(&free), Some(1));
    }

    #[test]
    fn test_pick_ties_break_to_lowest_index() {
        let free = vec![(0, 16_000), (1, 16_000), (2, 8_000)];
        assert_eq!(pick_most_free(&free), Some(0));

        let free = vec![(2, 16_000), (1, 16_000)];
        assert_eq!(pick_most_free(&free), Some(1));
    }

    #[test]
    fn test_pick_empty_is_none() {
        assert_eq!(pick_most_free(&[]), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(DeviceId::Cuda(1).to_string(), "cuda:1");
        assert_eq!(DeviceId::Cpu.to_string(), "cpu");
    }
}
