pub mod fees;
pub mod services;
pub mod validation;

// Re-export key types for convenience
pub use services::CustomsCalculator;
pub use validation::RawVehicleInput;
