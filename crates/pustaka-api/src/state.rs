//! Application state shared by every handler.

use std::sync::Arc;

use pustaka_core::Config;
use pustaka_db::Catalog;
use pustaka_storage::UploadStore;

#[derive(Clone)]
pub struct AppState {
    /// Category and book repositories for the configured engine.
    pub catalog: Catalog,
    /// Cover image store.
    pub uploads: Arc<dyn UploadStore>,
    pub config: Config,
}

impl AppState {
    pub fn new(catalog: Catalog, uploads: Arc<dyn UploadStore>, config: Config) -> Arc<Self> {
        Arc::new(Self {
            catalog,
            uploads,
            config,
        })
    }
}
