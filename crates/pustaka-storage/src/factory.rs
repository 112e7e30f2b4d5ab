use std::sync::Arc;

use pustaka_core::UploadConfig;

use crate::{LocalUploadStore, UploadResult, UploadStore};

/// Create the upload store described by the configuration.
pub async fn create_upload_store(config: &UploadConfig) -> UploadResult<Arc<dyn UploadStore>> {
    let store = LocalUploadStore::new(config).await?;

    tracing::info!(
        root = %store.root().display(),
        public_prefix = %store.public_prefix(),
        max_size_bytes = config.max_size_bytes,
        timezone = %config.timezone,
        "Upload store initialized"
    );

    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn creates_root_directory() {
        let dir = TempDir::new().unwrap();
        let config = UploadConfig {
            dir: dir.path().join("nested").join("uploads"),
            public_prefix: "/covers".to_string(),
            ..UploadConfig::default()
        };

        let store = create_upload_store(&config).await.unwrap();

        assert!(config.dir.is_dir());
        assert_eq!(store.public_prefix(), "/covers");
    }
}
