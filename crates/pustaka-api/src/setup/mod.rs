//! Application setup and initialization
//!
//! Everything `main` needs to turn a [`Config`] into a served router, split per concern
//! so tests can build the router without touching the network or global subscribers.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use pustaka_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.is_production())
        .context("Failed to initialize telemetry")?;

    tracing::info!(
        environment = %config.environment(),
        backend = %config.database_backend,
        "Configuration loaded and validated successfully"
    );

    let catalog = database::setup_catalog(&config).await?;
    let uploads = storage::setup_upload_store(&config).await?;

    let state = AppState::new(catalog, uploads, config.clone());
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
