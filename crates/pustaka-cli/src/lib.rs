//! Shared pieces of the `pustaka` operator CLI.

use std::time::Duration;

use anyhow::{Context, Result};
use pustaka_core::{Config, DatabaseBackend};
use pustaka_db::{Catalog, SeedReport};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Open a small pool; the CLI runs one statement at a time.
pub async fn connect(config: &Config) -> Result<PgPool> {
    if config.database_backend != DatabaseBackend::Postgres {
        anyhow::bail!(
            "DATABASE_BACKEND is {}, this command needs postgres",
            config.database_backend
        );
    }

    PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .connect(config.database_url())
        .await
        .context("Failed to connect to database")
}

/// Catalog for the configured engine. The in-memory engine starts empty and dies with
/// the process, which is only useful for a dry run of the seed data.
pub async fn open_catalog(config: &Config) -> Result<Catalog> {
    match config.database_backend {
        DatabaseBackend::Memory => {
            tracing::warn!("In-memory backend: seeded rows vanish when this command exits");
            Ok(Catalog::memory())
        }
        DatabaseBackend::Postgres => Ok(Catalog::postgres(connect(config).await?)),
    }
}

/// One-line summary of a seeding run.
pub fn describe_seed(report: &SeedReport) -> String {
    if *report == SeedReport::default() {
        "Catalog already has categories; nothing seeded".to_string()
    } else {
        format!(
            "Seeded {} categories and {} books",
            report.categories, report.books
        )
    }
}
