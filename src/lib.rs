//! # Marketplace delivery charges
//!
//! Location-based delivery pricing for a multi-seller marketplace.
//!
//! ## Architecture
//!
//! - **domain**: addresses, tariff settings and the delivery charge calculator
//! - **application**: quoting service used by checkout and the tariff admin
//! - **infrastructure**: settings storage
//! - **interfaces**: REST API
//! - **server**: runtime bootstrap and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig, ConfigError};
pub use domain::{
    calculate_delivery_breakdown, calculate_delivery_charge, Address, DefaultRates,
    DeliveryChargeBreakdown, DeliverySettings, DeliveryTier, PackageWeight,
};
pub use interfaces::http::create_api_router;
