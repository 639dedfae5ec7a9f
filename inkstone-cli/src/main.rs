//! inkstone command line entry point

mod commands;
mod tracing_setup;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::migrate::{run_migrate, MigrateArgs};
use commands::serve::{run_serve, ServeArgs};

#[derive(Parser, Debug)]
#[command(name = "inkstone", version, about = "Blogging platform API service")]
struct Cli {
    /// Enable debug logging (overridable with RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(ServeArgs),
    /// Run database migrations and exit
    Migrate(MigrateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Local development keeps its settings in .env, like the deployed
    // service keeps them in real environment variables.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(cli.debug)?;

    match cli.command {
        Commands::Serve(args) => run_serve(args).await,
        Commands::Migrate(args) => run_migrate(args).await,
    }
}
