// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Cross-process advisory file locking.
//!
//! Each logical path maps to a lock file named by the hex SHA-256 of the
//! path, held under an injected lock directory. Exclusion comes from the
//! OS advisory lock on the open lock-file handle, not from the file's
//! existence, so a crashed holder never wedges the path: its lock dies with
//! its descriptor. Lock files are unlinked on release.
//!
//! Advisory locks bind only processes that choose to participate, which is
//! sufficient here because every cooperating executor on the host goes
//! through this manager.

use fs2::FileExt;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// Upper bound on the sleep between contended acquire attempts.
const ACQUIRE_RETRY_INTERVAL: Duration = Duration::from_millis(100);

struct HeldLock {
    file: File,
    lock_path: PathBuf,
}

/// Per-path exclusive lock manager backed by OS advisory locks.
///
/// A path appears in the held-set iff the most recent [`acquire`] returned
/// `true` and [`release`] has not been called since. Safe for concurrent
/// callers; the internal map is only touched under its own mutex.
///
/// [`acquire`]: FileLockManager::acquire
/// [`release`]: FileLockManager::release
pub struct FileLockManager {
    lock_dir: PathBuf,
    held: Mutex<HashMap<String, HeldLock>>,
}

impl FileLockManager {
    /// Create a manager rooted at `lock_dir`. The directory is created on
    /// first acquire if absent.
    pub fn new(lock_dir: impl Into<PathBuf>) -> Self {
        Self {
            lock_dir: lock_dir.into(),
            held: Mutex::new(HashMap::new()),
        }
    }

    fn lock_path_for(&self, path: &str) -> PathBuf {
        let digest = Sha256::digest(path.as_bytes());
        self.lock_dir.join(format!("{digest:x}.lock"))
    }

    /// Acquire the exclusive lock for `path`, retrying until `timeout`.
    ///
    /// Returns `true` once the lock is held. Contention and lock-file
    /// creation errors are both retried on a bounded interval; when the
    /// deadline passes the attempt gives up and returns `false`.
    pub async fn acquire(&self, path: &str, timeout: Duration) -> bool {
        let lock_path = self.lock_path_for(path);
        let deadline = Instant::now() + timeout;

        loop {
            if self.try_acquire_once(path, &lock_path) {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            tokio::time::sleep(ACQUIRE_RETRY_INTERVAL.min(deadline - now)).await;
        }
    }

    fn try_acquire_once(&self, path: &str, lock_path: &Path) -> bool {
        if fs::create_dir_all(&self.lock_dir).is_err() {
            return false;
        }
        let file = match OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(lock_path)
        {
            Ok(file) => file,
            Err(_) => return false,
        };
        if file.try_lock_exclusive().is_err() {
            // Another holder; dropping the handle closes the descriptor.
            return false;
        }
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                path.to_string(),
                HeldLock {
                    file,
                    lock_path: lock_path.to_path_buf(),
                },
            );
        true
    }

    /// Release the lock for `path` and unlink its lock file.
    ///
    /// Releasing a path this manager does not hold is a no-op returning
    /// `false`.
    pub fn release(&self, path: &str) -> bool {
        let held = self
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path);
        match held {
            Some(lock) => {
                let _ = lock.file.unlock();
                let _ = fs::remove_file(&lock.lock_path);
                true
            }
            None => false,
        }
    }

    /// Release every path currently held by this manager.
    pub fn release_all(&self) {
        let paths: Vec<String> = self
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        for path in paths {
            self.release(&path);
        }
    }

    /// Number of paths currently held.
    pub fn held_count(&self) -> usize {
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
