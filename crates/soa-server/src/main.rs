//! # SOA Server
//!
//! Loads configuration, initialises logging, resolves the user service for
//! the configured DAO backend, and invokes it once.

use soa_config::ConfigLoader;
use soa_core::telemetry::{init_telemetry, shutdown_telemetry};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location() {
        Ok(loader) => loader.get().await,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_telemetry(&config.telemetry) {
        eprintln!("Failed to initialise logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting {}...", config.app.name);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let result = soa_server::run(config).await;
    shutdown_telemetry();

    if let Err(e) = result {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}
