//! Headless puzzle server.
//!
//! Serves one independent session per TCP connection using the
//! line-delimited JSON protocol from the `adapter` crate.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use geo_puzzle::adapter::{run_server, ServerConfig};
use geo_puzzle::config::engine_config_from_env;
use geo_puzzle::core::LevelCatalog;
use geo_puzzle::logging;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_stderr();

    let config = ServerConfig::from_env();
    let engine = engine_config_from_env();
    info!(host = %config.host, port = config.port, ?engine, "starting puzzle server");

    run_server(config, Arc::new(LevelCatalog::builtin()), engine, None).await
}
