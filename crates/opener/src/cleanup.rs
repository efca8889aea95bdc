//! Deferred, best-effort deletion of temp-copy directories.
//!
//! Each deletion runs as its own background task with a cancellation token.
//! Failures are logged at debug level and otherwise ignored; nothing retries.

use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// How long a temp copy outlives the launch that created it.
pub const CLEANUP_DELAY: Duration = Duration::from_secs(5);

pub struct CleanupHandle {
    directory: PathBuf,
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl CleanupHandle {
    /// Remove `directory` recursively once `delay` has passed.
    pub fn schedule(directory: PathBuf, delay: Duration) -> Self {
        let token = CancellationToken::new();
        let task = tokio::spawn(remove_later(directory.clone(), delay, token.clone()));
        Self {
            directory,
            token,
            task,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Abandon the deletion. The directory is left in place.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn wait(self) {
        let _ = self.task.await;
    }
}

async fn remove_later(directory: PathBuf, delay: Duration, token: CancellationToken) {
    tokio::select! {
        _ = token.cancelled() => {
            tracing::debug!("Cleanup of {} cancelled", directory.display());
        }
        _ = tokio::time::sleep(delay) => {
            match tokio::fs::remove_dir_all(&directory).await {
                Ok(()) => tracing::debug!("Removed temp copy {}", directory.display()),
                Err(e) => tracing::debug!("Could not remove {}: {}", directory.display(), e),
            }
        }
    }
}

/// Pending cleanups owned by one opener.
#[derive(Default)]
pub struct CleanupQueue {
    pending: Mutex<Vec<CleanupHandle>>,
}

impl CleanupQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&self, directory: PathBuf, delay: Duration) {
        let handle = CleanupHandle::schedule(directory, delay);
        let mut pending = self.pending.lock();
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    /// Cleanups that have not run yet.
    pub fn pending(&self) -> usize {
        let mut pending = self.pending.lock();
        pending.retain(|h| !h.is_finished());
        pending.len()
    }

    /// Skip the remaining delays and delete every pending directory now.
    pub async fn remove_now(&self) {
        let handles = std::mem::take(&mut *self.pending.lock());
        for handle in handles {
            handle.cancel();
            let directory = handle.directory().to_path_buf();
            handle.wait().await;
            match tokio::fs::remove_dir_all(&directory).await {
                Ok(()) => tracing::debug!("Removed temp copy {}", directory.display()),
                Err(e) => tracing::debug!("Could not remove {}: {}", directory.display(), e),
            }
        }
    }

    /// Wait until every scheduled cleanup has run.
    pub async fn drain(&self) {
        let handles = std::mem::take(&mut *self.pending.lock());
        if !handles.is_empty() {
            tracing::info!("Waiting for {} temp cleanup(s)", handles.len());
        }
        for handle in handles {
            handle.wait().await;
        }
    }
}
