use crate::models::UploadReference;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::io::{AsyncRead, AsyncWriteExt};

/// Where uploaded PDFs live between the upload and later editor stages
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Streams `reader` to a file named `filename`, replacing any existing one.
    /// `filename` must already be sanitized.
    async fn save<'a>(
        &self,
        filename: &str,
        reader: Box<dyn AsyncRead + Unpin + Send + 'a>,
    ) -> Result<UploadReference>;

    /// True if the referenced file is still present inside the store
    async fn exists(&self, reference: &UploadReference) -> bool;

    /// Deletes stored files last modified at least `max_age` ago, returning how many went
    async fn remove_older_than(&self, max_age: Duration) -> Result<usize>;

    /// Check if the store can currently accept uploads
    async fn health_check(&self) -> bool;
}

/// Upload store backed by a local directory
pub struct LocalUploadStore {
    root: PathBuf,
}

impl LocalUploadStore {
    /// Creates the directory if needed and resolves it to an absolute path
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        tokio::fs::create_dir_all(root)
            .await
            .with_context(|| format!("Failed to create upload directory {}", root.display()))?;
        let root = tokio::fs::canonicalize(root)
            .await
            .with_context(|| format!("Failed to resolve upload directory {}", root.display()))?;

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl UploadStore for LocalUploadStore {
    async fn save<'a>(
        &self,
        filename: &str,
        mut reader: Box<dyn AsyncRead + Unpin + Send + 'a>,
    ) -> Result<UploadReference> {
        let path = self.root.join(filename);

        let mut file = tokio::fs::File::create(&path)
            .await
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let written = tokio::io::copy(&mut reader, &mut file)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        file.flush().await?;

        tracing::debug!("Stored {} bytes at {}", written, path.display());

        Ok(UploadReference {
            filename: filename.to_string(),
            path,
        })
    }

    async fn exists(&self, reference: &UploadReference) -> bool {
        if !reference.path.starts_with(&self.root) {
            tracing::warn!(
                "Session references a file outside the upload directory: {}",
                reference.path.display()
            );
            return false;
        }

        tokio::fs::metadata(&reference.path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    async fn remove_older_than(&self, max_age: Duration) -> Result<usize> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let now = SystemTime::now();
        let mut removed = 0;

        while let Some(entry) = entries.next_entry().await? {
            let meta = match entry.metadata().await {
                Ok(meta) if meta.is_file() => meta,
                _ => continue,
            };

            let age = meta
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .unwrap_or_default();

            if age >= max_age {
                match tokio::fs::remove_file(entry.path()).await {
                    Ok(()) => removed += 1,
                    Err(e) => {
                        tracing::error!("Failed to remove {}: {}", entry.path().display(), e)
                    }
                }
            }
        }

        Ok(removed)
    }

    async fn health_check(&self) -> bool {
        tokio::fs::metadata(&self.root)
            .await
            .map(|meta| meta.is_dir() && !meta.permissions().readonly())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_save_and_exists() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalUploadStore::new(dir.path()).await.unwrap();

        let reference = store
            .save("report.pdf", Box::new(Cursor::new(b"%PDF-1.7 test".to_vec())))
            .await
            .unwrap();

        assert_eq!(reference.filename, "report.pdf");
        assert!(reference.path.is_absolute());
        assert!(store.exists(&reference).await);
        assert_eq!(
            std::fs::read(&reference.path).unwrap(),
            b"%PDF-1.7 test".to_vec()
        );

        std::fs::remove_file(&reference.path).unwrap();
        assert!(!store.exists(&reference).await);
    }

    #[tokio::test]
    async fn test_save_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalUploadStore::new(dir.path()).await.unwrap();

        store
            .save("a.pdf", Box::new(Cursor::new(b"first".to_vec())))
            .await
            .unwrap();
        let reference = store
            .save("a.pdf", Box::new(Cursor::new(b"second".to_vec())))
            .await
            .unwrap();

        assert_eq!(std::fs::read(&reference.path).unwrap(), b"second".to_vec());
    }

    #[tokio::test]
    async fn test_exists_rejects_paths_outside_root() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::NamedTempFile::new().unwrap();
        let store = LocalUploadStore::new(dir.path()).await.unwrap();

        let reference = UploadReference {
            filename: "x.pdf".to_string(),
            path: other.path().to_path_buf(),
        };
        assert!(!store.exists(&reference).await);
    }

    #[tokio::test]
    async fn test_remove_older_than() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalUploadStore::new(dir.path()).await.unwrap();
        store
            .save("fresh.pdf", Box::new(Cursor::new(b"data".to_vec())))
            .await
            .unwrap();

        let removed = store
            .remove_older_than(Duration::from_secs(3600))
            .await
            .unwrap();
        assert_eq!(removed, 0);
        assert!(dir.path().join("fresh.pdf").exists());

        let removed = store.remove_older_than(Duration::ZERO).await.unwrap();
        assert_eq!(removed, 1);
        assert!(!dir.path().join("fresh.pdf").exists());
    }

    #[tokio::test]
    async fn test_health_check() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalUploadStore::new(dir.path()).await.unwrap();
        assert!(store.health_check().await);
    }
}
