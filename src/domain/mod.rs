pub mod calculation;
pub mod tariff;
pub mod vehicle;

// Re-export commonly used types
pub use calculation::{labels, CalculationResult, FeeLine, LineItem};
pub use tariff::{
    CapacityBands, ClearanceTier, CurrencyRates, DutyBracket, DutyRateBand, RecyclingFactor,
    RegionFees, TariffTable,
};
pub use vehicle::{Currency, EngineType, ExtraFee, Region, VehicleAge, VehicleProfile};
