use crate::services::upload_store::UploadStore;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{Duration, sleep};

/// Periodically deletes uploads no live session can still point at
pub struct CleanupWorker {
    store: Arc<dyn UploadStore>,
    max_age: Duration,
    interval: Duration,
    shutdown: watch::Receiver<bool>,
}

impl CleanupWorker {
    pub fn new(
        store: Arc<dyn UploadStore>,
        max_age: Duration,
        interval: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            store,
            max_age,
            interval,
            shutdown,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("🚀 Cleanup worker started");

        loop {
            tokio::select! {
                _ = self.shutdown.changed() => {
                    tracing::info!("🛑 Cleanup worker shutting down");
                    break;
                }
                _ = sleep(self.interval) => {
                    self.perform_cleanup().await;
                }
            }
        }
    }

    pub async fn perform_cleanup(&self) -> usize {
        tracing::info!("🧹 Removing uploads older than {:?}...", self.max_age);

        match self.store.remove_older_than(self.max_age).await {
            Ok(removed) => {
                tracing::info!("✅ Cleanup completed, {} file(s) removed", removed);
                removed
            }
            Err(e) => {
                tracing::error!("Upload cleanup failed: {:?}", e);
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::upload_store::LocalUploadStore;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_cleanup_removes_expired_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(LocalUploadStore::new(dir.path()).await.unwrap());
        store
            .save("old.pdf", Box::new(Cursor::new(b"data".to_vec())))
            .await
            .unwrap();

        let (_tx, rx) = watch::channel(false);
        let worker = CleanupWorker::new(store, Duration::ZERO, Duration::from_secs(60), rx);

        assert_eq!(worker.perform_cleanup().await, 1);
        assert!(!dir.path().join("old.pdf").exists());
    }

    #[tokio::test]
    async fn test_cleanup_keeps_fresh_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(LocalUploadStore::new(dir.path()).await.unwrap());
        store
            .save("new.pdf", Box::new(Cursor::new(b"data".to_vec())))
            .await
            .unwrap();

        let (_tx, rx) = watch::channel(false);
        let worker =
            CleanupWorker::new(store, Duration::from_secs(3600), Duration::from_secs(60), rx);

        assert_eq!(worker.perform_cleanup().await, 0);
        assert!(dir.path().join("new.pdf").exists());
    }

    #[tokio::test]
    async fn test_worker_stops_on_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(LocalUploadStore::new(dir.path()).await.unwrap());

        let (tx, rx) = watch::channel(false);
        let worker = CleanupWorker::new(store, Duration::ZERO, Duration::from_secs(3600), rx);
        let handle = tokio::spawn(worker.run());

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("worker did not stop")
            .unwrap();
    }
}
