//! Upload store setup

use anyhow::{Context, Result};
use pustaka_core::Config;
use pustaka_storage::{create_upload_store, UploadStore};
use std::sync::Arc;

pub async fn setup_upload_store(config: &Config) -> Result<Arc<dyn UploadStore>> {
    let store = create_upload_store(&config.upload).await.with_context(|| {
        format!(
            "Failed to prepare upload directory {}",
            config.upload.dir.display()
        )
    })?;

    tracing::info!(
        dir = %config.upload.dir.display(),
        public_prefix = %config.upload.public_prefix,
        max_size_mb = config.upload.max_size_mb(),
        allowed_content_types = %config.upload.allowed_content_types.join(","),
        timezone = %config.upload.timezone,
        "Upload store ready"
    );

    Ok(store)
}
