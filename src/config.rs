//! Application configuration
//!
//! Loaded from a TOML file, by default
//! `~/.config/marketplace-delivery/config.toml`:
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! shutdown_timeout = 30
//!
//! [logging]
//! level = "info"
//! format = "pretty"   # or "json"
//!
//! [delivery]
//! currency = "BDT"
//!
//! [delivery.defaults]
//! intra_upazilla_charge = 60
//! intra_upazilla_extra_kg_charge = 20
//!
//! # Tariff as exported from the admin panel; any key spelling is accepted.
//! [delivery.rates]
//! intraThanaCharge = 65
//! inter_district_charge = "140"
//! ```

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::{DefaultRates, DeliverySettings};

pub const CONFIG_DIR_NAME: &str = "marketplace-delivery";
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// `<config dir>/marketplace-delivery/config.toml`, or `./config.toml`
/// when the platform has no config directory.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub delivery: DeliveryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    pub currency: String,
    pub defaults: DefaultRates,
    /// Raw tariff object; normalized through [`DeliverySettings::from_raw`].
    pub rates: Value,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            currency: "BDT".to_string(),
            defaults: DefaultRates::default(),
            rates: Value::Null,
        }
    }
}

impl DeliveryConfig {
    pub fn initial_settings(&self) -> DeliverySettings {
        DeliverySettings::from_raw(&self.rates, &self.defaults)
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".into()));
        }
        if self.delivery.currency.trim().is_empty() {
            return Err(ConfigError::Invalid("delivery.currency must be set".into()));
        }

        let d = &self.delivery.defaults;
        let defaults = [
            ("intra_upazilla_charge", d.intra_upazilla_charge),
            ("intra_upazilla_extra_kg_charge", d.intra_upazilla_extra_kg_charge),
            ("intra_district_charge", d.intra_district_charge),
            ("intra_district_extra_kg_charge", d.intra_district_extra_kg_charge),
            ("inter_district_charge", d.inter_district_charge),
            ("inter_district_extra_kg_charge", d.inter_district_extra_kg_charge),
        ];
        if let Some((name, _)) = defaults.iter().find(|(_, v)| *v <= Decimal::ZERO) {
            return Err(ConfigError::Invalid(format!(
                "delivery.defaults.{} must be positive",
                name
            )));
        }

        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.delivery.currency, "BDT");
        assert_eq!(cfg.delivery.initial_settings(), DeliverySettings::default());
    }

    #[test]
    fn parses_sections_and_raw_rates() {
        let cfg = AppConfig::from_toml(
            r#"
            [server]
            port = 9090

            [logging]
            format = "json"

            [delivery.defaults]
            inter_district_charge = 150

            [delivery.rates]
            intraThanaCharge = 65
            intra_district_charge = "115.5"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.address(), "0.0.0.0:9090");
        assert_eq!(cfg.logging.format, "json");

        let s = cfg.delivery.initial_settings();
        assert_eq!(s.intra_upazilla_charge, Decimal::from(65));
        assert_eq!(s.intra_district_charge, Decimal::new(1155, 1));
        assert_eq!(s.inter_district_charge, Decimal::from(150));
        assert_eq!(s.inter_district_extra_kg_charge, Decimal::from(40));
    }

    #[test]
    fn rejects_zero_port() {
        let err = AppConfig::from_toml("[server]\nport = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_non_positive_default_rate() {
        let err = AppConfig::from_toml("[delivery.defaults]\nintra_district_charge = 0").unwrap_err();
        assert!(err.to_string().contains("intra_district_charge"));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = AppConfig::from_toml("[server\nport = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = AppConfig::load(Path::new("/nonexistent/marketplace-delivery.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
