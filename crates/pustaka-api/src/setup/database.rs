//! Database setup and initialization

use anyhow::{Context, Result};
use pustaka_core::{Config, DatabaseBackend};
use pustaka_db::{run_migrations, Catalog};
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

/// Open the configured storage engine. PostgreSQL gets a pool and pending migrations.
pub async fn setup_catalog(config: &Config) -> Result<Catalog> {
    match config.database_backend {
        DatabaseBackend::Memory => {
            tracing::warn!("Using the in-memory catalog - data is lost on restart");
            Ok(Catalog::memory())
        }
        DatabaseBackend::Postgres => {
            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections())
                .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
                .idle_timeout(Duration::from_secs(600))
                .max_lifetime(Duration::from_secs(1800))
                .connect(config.database_url())
                .await
                .context("Failed to connect to database")?;

            tracing::info!(
                max_connections = config.db_max_connections(),
                "Database connected successfully"
            );

            run_migrations(&pool).await?;

            Ok(Catalog::postgres(pool))
        }
    }
}
