//! Delivery service runtime.
//!
//! [`ServerHandle`] owns the REST API task and its shutdown signal, so the
//! service binary and the CLI's `serve` command share one bootstrap path.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::application::DeliveryChargeService;
use crate::config::AppConfig;
use crate::infrastructure::InMemoryDeliverySettingsRepository;
use crate::interfaces::http::create_api_router;
use crate::shared::shutdown::{listen_for_shutdown_signals, ShutdownSignal};

/// Handle to a running delivery service.
pub struct ServerHandle {
    pub service: Arc<DeliveryChargeService>,
    local_addr: SocketAddr,
    shutdown: ShutdownSignal,
    shutdown_timeout: Duration,
    api_task: JoinHandle<()>,
}

impl ServerHandle {
    /// Build the service from `config`, bind the listener and start serving.
    pub async fn start(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Starting marketplace delivery service...");

        let settings = config.delivery.initial_settings();
        info!(
            intra_upazilla = %settings.intra_upazilla_charge,
            intra_district = %settings.intra_district_charge,
            inter_district = %settings.inter_district_charge,
            currency = config.delivery.currency.as_str(),
            "Delivery tariff loaded"
        );

        let repo = Arc::new(InMemoryDeliverySettingsRepository::new(settings));
        let service = Arc::new(DeliveryChargeService::new(
            repo,
            config.delivery.defaults.clone(),
            config.delivery.currency.clone(),
        ));

        let router = create_api_router(service.clone());

        let listener = tokio::net::TcpListener::bind(config.server.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);

        let shutdown = ShutdownSignal::new();
        let api_shutdown = shutdown.clone();
        let api_task = tokio::spawn(async move {
            let server = axum::serve(listener, router).with_graceful_shutdown(async move {
                api_shutdown.wait().await;
                info!("🛑 REST API server received shutdown signal");
            });
            if let Err(e) = server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            service,
            local_addr,
            shutdown,
            shutdown_timeout: Duration::from_secs(config.server.shutdown_timeout),
            api_task,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Trigger shutdown on SIGTERM / SIGINT.
    pub fn install_signal_handler(&self) {
        tokio::spawn(listen_for_shutdown_signals(self.shutdown.clone()));
    }

    /// Wait for the API task to finish, bounded by the shutdown timeout
    /// once shutdown has been triggered.
    pub async fn wait(self) {
        self.shutdown.wait().await;
        info!(
            "⏳ Waiting up to {}s for in-flight requests...",
            self.shutdown_timeout.as_secs()
        );

        match tokio::time::timeout(self.shutdown_timeout, self.api_task).await {
            Ok(Ok(())) => info!("REST API server stopped"),
            Ok(Err(e)) => error!("REST API server task panicked: {}", e),
            Err(_) => warn!(
                "⚠️ Graceful shutdown timed out after {}s",
                self.shutdown_timeout.as_secs()
            ),
        }

        info!("👋 Marketplace delivery service shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        self.shutdown.trigger();
        self.wait().await;
    }
}

/// Initialize tracing from the application config.
///
/// `RUST_LOG` takes precedence over `logging.level`.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
