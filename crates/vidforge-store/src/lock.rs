//! Advisory lock helpers.
//!
//! Locks are taken on a sidecar `.lock` file, never on the data file: every
//! save replaces the data file's inode via rename, so a lock held on the old
//! inode would not serialize against the next writer opening the new one.
//! The sidecar file is created once and its inode is stable.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use fs2::FileExt;

/// An acquired advisory lock, released on drop.
pub(crate) struct LockGuard {
    file: File,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        // Unlock also happens implicitly when the descriptor closes.
        let _ = self.file.unlock();
    }
}

fn open_lock_file(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
}

/// Block until a shared (reader) lock is held on `path`.
pub(crate) fn lock_shared(path: &Path) -> io::Result<LockGuard> {
    let file = open_lock_file(path)?;
    file.lock_shared()?;
    Ok(LockGuard { file })
}

/// Block until an exclusive (writer) lock is held on `path`.
pub(crate) fn lock_exclusive(path: &Path) -> io::Result<LockGuard> {
    let file = open_lock_file(path)?;
    file.lock_exclusive()?;
    Ok(LockGuard { file })
}
