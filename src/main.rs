//! Marketplace delivery charge service.
//!
//! Reads configuration from `DELIVERY_CONFIG` or
//! `~/.config/marketplace-delivery/config.toml`.

use tracing::{error, info};

use marketplace_delivery::server::{init_tracing, ServerHandle};
use marketplace_delivery::{default_config_path, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("DELIVERY_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());

    let config = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            let cfg = AppConfig::default();
            init_tracing(&cfg);
            error!("Failed to load config: {}. Using defaults.", e);
            cfg
        }
    };

    let handle = ServerHandle::start(config).await?;
    handle.install_signal_handler();

    info!("🚀 Server started. Press Ctrl+C to shutdown gracefully.");
    handle.wait().await;

    Ok(())
}
