use crate::config::ScanConfig;
use crate::services::storage::TempStorage;
use anyhow::Context;
use std::sync::Arc;
use tracing::info;

pub async fn setup_storage(config: &ScanConfig) -> anyhow::Result<Arc<TempStorage>> {
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| {
            format!(
                "failed to create upload directory {}",
                config.upload_dir.display()
            )
        })?;

    info!("📂 Upload directory: {}", config.upload_dir.display());

    Ok(Arc::new(TempStorage::new(config.upload_dir.clone())))
}
