//! Single-run lock on the output directory.
//!
//! Overlapping runs would race on the run log and the latest artifacts,
//! so a run takes an advisory exclusive lock on a file in the output
//! directory before doing anything else. Contention aborts the new run
//! before it touches the generator or the log; the in-flight run is left
//! undisturbed. The lock file itself is never deleted.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{RunError, RunResult};

/// File name of the lock file inside the output directory.
pub const LOCK_FILENAME: &str = ".reportrun.lock";

/// Advisory exclusive lock held for the duration of a run.
///
/// Released when the guard drops (or when the process exits).
#[derive(Debug)]
pub struct RunLock {
    file: File,
    path: PathBuf,
}

impl RunLock {
    /// Acquires the lock for `output_dir`, failing fast on contention.
    pub fn acquire(output_dir: &Path) -> RunResult<Self> {
        let path = output_dir.join(LOCK_FILENAME);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&path)
            .map_err(|e| RunError::LockIo {
                path: path.clone(),
                source: e,
            })?;

        FileExt::try_lock_exclusive(&file).map_err(|_| RunError::LockHeld { path: path.clone() })?;

        Ok(Self { file, path })
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_creates_lock_file() {
        let tmp = tempfile::tempdir().unwrap();
        let lock = RunLock::acquire(tmp.path()).unwrap();
        assert!(lock.path().exists());
    }

    #[test]
    fn test_second_acquire_fails_while_held() {
        let tmp = tempfile::tempdir().unwrap();
        let _held = RunLock::acquire(tmp.path()).unwrap();

        let err = RunLock::acquire(tmp.path()).unwrap_err();
        assert!(matches!(err, RunError::LockHeld { .. }));
    }

    #[test]
    fn test_lock_is_released_on_drop() {
        let tmp = tempfile::tempdir().unwrap();
        let held = RunLock::acquire(tmp.path()).unwrap();
        drop(held);

        RunLock::acquire(tmp.path()).unwrap();
    }

    #[test]
    fn test_lock_file_is_kept_after_release() {
        let tmp = tempfile::tempdir().unwrap();
        let path = {
            let lock = RunLock::acquire(tmp.path()).unwrap();
            lock.path().to_path_buf()
        };
        assert!(path.exists());
    }

    #[test]
    fn test_acquire_fails_in_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("does-not-exist");
        let err = RunLock::acquire(&missing).unwrap_err();
        assert!(matches!(err, RunError::LockIo { .. }));
    }
}
