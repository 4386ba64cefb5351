use crate::config::AppConfig;
use crate::services::upload_store::{LocalUploadStore, UploadStore};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

pub async fn setup_storage(config: &AppConfig) -> Result<Arc<dyn UploadStore>> {
    let store = LocalUploadStore::new(&config.upload_dir).await?;
    info!("📁 Upload directory: {}", store.root().display());
    Ok(Arc::new(store))
}
