//! Delayed deletion of served clips.

use std::{path::PathBuf, time::Duration};

use tokio_util::{sync::CancellationToken, task::TaskTracker};

/// Deletes each scheduled file exactly once, after its delay or at shutdown.
#[derive(Debug, Clone, Default)]
pub struct CleanupScheduler {
    tracker: TaskTracker,
    cancel: CancellationToken,
}

impl CleanupScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&self, path: PathBuf, after: Duration) {
        let cancel = self.cancel.clone();
        self.tracker.spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(after) => {}
                _ = cancel.cancelled() => {
                    tracing::debug!(path = %path.display(), "shutdown; deleting clip early");
                }
            }

            match tokio::fs::remove_file(&path).await {
                Ok(()) => tracing::info!(path = %path.display(), "deleted expired clip"),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "failed to delete clip")
                }
            }
        });
    }

    /// Deletions that have not finished yet.
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    /// Fires every pending deletion now and waits for them to finish.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        self.tracker.close();
        self.tracker.wait().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn deletes_after_delay() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clipped_1.mp4");
        std::fs::write(&path, b"clip").unwrap();

        let scheduler = CleanupScheduler::new();
        let started = Instant::now();
        scheduler.schedule(path.clone(), Duration::from_secs(120));
        assert_eq!(scheduler.pending(), 1);

        tokio::time::sleep(Duration::from_secs(119)).await;
        assert!(path.exists());

        scheduler.tracker.close();
        scheduler.tracker.wait().await;
        assert!(!path.exists());
        assert!(started.elapsed() >= Duration::from_secs(120));
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_deletes_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clipped_2.mp4");
        std::fs::write(&path, b"clip").unwrap();

        let scheduler = CleanupScheduler::new();
        let started = Instant::now();
        scheduler.schedule(path.clone(), Duration::from_secs(120));
        scheduler.shutdown().await;

        assert!(!path.exists());
        assert!(started.elapsed() < Duration::from_secs(120));
    }

    #[tokio::test]
    async fn missing_file_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let scheduler = CleanupScheduler::new();
        scheduler.schedule(dir.path().join("gone.mp4"), Duration::from_millis(1));
        scheduler.shutdown().await;
        assert_eq!(scheduler.pending(), 0);
    }
}
