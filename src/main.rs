// src/main.rs
use anyhow::Result;
use tracing::info;

mod config;
mod health;

use crate::health::HealthChecker;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gostdb_conn=debug".parse()?),
        )
        .init();

    // Load the baseline configuration, if a file was given
    let mut config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading baseline configuration from: {}", path);
            config::load_config(&path).await?
        }
        None => config::DbConfig::default(),
    };

    // Environment overrides and defaults
    config.resolve();
    info!("Resolved gost db type: {}", config.db_type);

    // Probe the server before anything tries to use it
    HealthChecker::new().check(&config).await?;
    info!("gost db connection settings are usable");

    Ok(())
}
