//! Tracing setup for the inkstone CLI
//!
//! Usage:
//!   inkstone --debug serve            # Debug logging to console
//!   RUST_LOG=inkstone=debug inkstone  # Fine-grained log control

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Initialize console tracing. An explicit RUST_LOG wins over the
/// --debug flag.
pub fn init(debug: bool) -> Result<()> {
    let default_filter = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
