//! HTTP server command

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use inkstone_server::db::{self, migrations};
use inkstone_server::{run_server, AppConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides HOST/PORT)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Database URL (overrides DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,
}

/// Run the HTTP server until shutdown.
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut config = AppConfig::from_env();
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(url) = args.database_url {
        config.database_url = url;
    }

    let pool = db::create_pool(&config.database_url)
        .await
        .context("failed to create database pool")?;

    migrations::run(&pool)
        .await
        .context("failed to run migrations")?;

    run_server(pool, config).await.context("server error")?;

    Ok(())
}
