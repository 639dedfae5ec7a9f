//! Standalone migrations command

use anyhow::{Context, Result};
use clap::Parser;

use inkstone_server::db::{self, migrations};
use inkstone_server::AppConfig;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,
}

/// Run migrations against the configured database and exit.
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let config = AppConfig::from_env();
    let database_url = args.database_url.unwrap_or(config.database_url);

    let pool = db::create_pool(&database_url)
        .await
        .context("failed to create database pool")?;

    migrations::run(&pool)
        .await
        .context("failed to run migrations")?;

    tracing::info!("database is up to date");
    Ok(())
}
