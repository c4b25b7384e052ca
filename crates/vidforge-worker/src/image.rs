//! Reference image loading.

use std::path::{Path, PathBuf};

use image::GenericImageView;
use tracing::debug;

use crate::error::{WorkerError, WorkerResult};

/// A reference still image, decoded once per group and reused for every
/// sub-job.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Verify the reference image exists, decode it once, and return its
/// dimensions. Missing and undecodable images are group-level errors.
pub fn load_reference_image(group_id: u64, path: &Path) -> WorkerResult<LoadedImage> {
    if !path.exists() {
        return Err(WorkerError::MissingImage {
            group_id,
            path: path.to_path_buf(),
        });
    }

    let bytes = std::fs::read(path).map_err(|e| WorkerError::ImageUnreadable {
        group_id,
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let decoded = image::load_from_memory(&bytes).map_err(|e| WorkerError::ImageUnreadable {
        group_id,
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let loaded = LoadedImage {
        path: path.to_path_buf(),
        width: decoded.width(),
        height: decoded.height(),
    };
    debug!(
        group_id = group_id,
        width = loaded.width,
        height = loaded.height,
        "Loaded reference image"
    );
    Ok(loaded)
}
