//! Tariff aggregate
//!
//! Contains the tariff table, its bracketed lookup algorithms, and the
//! structural validation of threshold ordering.

pub mod model;

pub use model::{
    CapacityBands, ClearanceTier, CurrencyRates, DutyBracket, DutyRateBand, RecyclingConfig,
    RecyclingFactor, RegionFees, TariffTable,
};
