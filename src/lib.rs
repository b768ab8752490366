//! # Vostok Customs Engine
//!
//! Tariff computation engine for the total import-customs cost of a
//! vehicle brought in from China or Korea.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities — the vehicle profile, the tariff
//!   table with its bracketed lookups, and the itemized result
//! - **application**: Input validation, the four fee calculators, and the
//!   aggregating calculation service
//! - **shared**: Error taxonomy used across layers
//! - **config**: TOML-backed application configuration
//!
//! The engine is a pure function of (vehicle profile, tariff table): no
//! I/O beyond advisory logging, no session or network state. The tariff
//! table is loaded once at process start and shared read-only; concurrent
//! calculations need no locking.

pub mod application;
pub mod config;
pub mod domain;
pub mod shared;

pub use config::{default_config_path, init_tracing, AppConfig, LoggingConfig};

// Re-export the engine surface for easy access
pub use application::{CustomsCalculator, RawVehicleInput};
pub use domain::calculation::{labels, CalculationResult, FeeLine, LineItem};
pub use domain::tariff::TariffTable;
pub use domain::vehicle::{Currency, EngineType, ExtraFee, Region, VehicleAge, VehicleProfile};
pub use shared::errors::{ConfigError, CustomsError, CustomsResult};
