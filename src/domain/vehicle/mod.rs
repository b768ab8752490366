//! Vehicle aggregate
//!
//! Contains the validated vehicle profile and its enumerated attributes.

pub mod model;

pub use model::{Currency, EngineType, ExtraFee, Region, VehicleAge, VehicleProfile};
