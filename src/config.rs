//! Configuration module
//!
//! TOML-backed application configuration with built-in defaults. The
//! tariff table is part of the configuration and changes only via
//! redeployment; there is no runtime reloading.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::tariff::TariffTable;
use crate::shared::errors::ConfigError;

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error).
    pub level: String,
    /// Emit JSON-formatted log lines.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub tariffs: TariffTable,
}

impl AppConfig {
    /// Load configuration from a TOML file and check the tariff table
    /// invariants. Fields absent from the file keep their built-in
    /// defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&raw)?;
        config.tariffs.validate()?;
        Ok(config)
    }
}

/// Default configuration file location
/// (~/.config/vostok-customs/config.toml).
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vostok-customs")
        .join("config.toml")
}

/// Initialize tracing from the logging configuration. `RUST_LOG` wins
/// over the configured level.
pub fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));
    if config.logging.json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.tariffs.min_vehicle_price_rub, 10_000.0);
    }

    #[test]
    fn partial_override_keeps_default_tariffs() {
        let config: AppConfig = toml::from_str(
            r#"
            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.tariffs, TariffTable::default());
    }

    #[test]
    fn tariff_slices_can_be_overridden() {
        let config: AppConfig = toml::from_str(
            r#"
            [tariffs]
            min_vehicle_price_rub = 50000.0

            [tariffs.rates]
            eur_to_rub = 100.0
            usd_to_rub = 95.0
            cny_to_rub = 12.5
            krw_to_rub = 0.08
            "#,
        )
        .unwrap();
        assert_eq!(config.tariffs.min_vehicle_price_rub, 50_000.0);
        assert_eq!(config.tariffs.rates.eur_to_rub, 100.0);
        // Untouched slices keep the built-in values.
        assert_eq!(config.tariffs.clearance_fee_schedule.len(), 8);
    }

    #[test]
    fn recycling_factors_deserialize_flat_and_banded() {
        let config: AppConfig = toml::from_str(
            r#"
            [tariffs.recycling]
            base_rub = 20000.0

            [tariffs.recycling.factors.under_3]
            electric = 0.17
            gasoline = { default = 0.17, band_over_3501 = 137.11 }
            "#,
        )
        .unwrap();
        use crate::domain::vehicle::{EngineType, VehicleAge};
        let factor = config
            .tariffs
            .recycling_factor(VehicleAge::Under3, EngineType::Gasoline)
            .unwrap();
        assert_eq!(factor.for_capacity(4_000.0), 137.11);
        let flat = config
            .tariffs
            .recycling_factor(VehicleAge::Under3, EngineType::Electric)
            .unwrap();
        assert_eq!(flat.for_capacity(0.0), 0.17);
    }

    #[test]
    fn default_path_ends_with_the_app_directory() {
        let path = default_config_path();
        assert!(path.ends_with("vostok-customs/config.toml"));
    }
}
