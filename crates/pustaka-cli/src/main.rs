//! Pustaka CLI: database maintenance for the catalog service.
//!
//! Reads the same environment (and `.env`) as the API server.

use anyhow::Context;
use clap::{Parser, Subcommand};
use pustaka_cli::{connect, describe_seed, init_tracing, open_catalog};
use pustaka_core::Config;

#[derive(Parser)]
#[command(name = "pustaka", about = "Pustaka catalog maintenance")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending SQL migrations
    Migrate,
    /// Insert the sample categories and books into an empty catalog
    Seed {
        /// Apply pending migrations first
        #[arg(long)]
        migrate: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Migrate => {
            let pool = connect(&config).await?;
            pustaka_db::run_migrations(&pool).await?;
            pool.close().await;
            println!("Migrations applied");
        }
        Commands::Seed { migrate } => {
            if migrate {
                let pool = connect(&config).await?;
                pustaka_db::run_migrations(&pool).await?;
                pool.close().await;
            }
            let catalog = open_catalog(&config).await?;
            let report = pustaka_db::seed_catalog(&catalog)
                .await
                .context("Seeding failed")?;
            catalog.close().await;
            println!("{}", describe_seed(&report));
        }
    }

    Ok(())
}
