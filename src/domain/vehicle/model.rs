//! Vehicle profile domain entity

use serde::{Deserialize, Serialize};

/// Regulatory age bracket of an imported vehicle. Each bracket drives a
/// distinct duty formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VehicleAge {
    #[serde(rename = "under_3")]
    Under3,
    #[serde(rename = "3_to_5")]
    ThreeTo5,
}

impl VehicleAge {
    /// Parse a user-supplied age bracket. Accepts the spellings the
    /// conversational front-ends are known to send.
    pub fn from_raw(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "under_3" | "under-3" | "under 3" | "0-3" | "<3" => Some(Self::Under3),
            "3_to_5" | "3-5" | "3 to 5" => Some(Self::ThreeTo5),
            _ => None,
        }
    }
}

impl std::fmt::Display for VehicleAge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Under3 => write!(f, "under 3"),
            Self::ThreeTo5 => write!(f, "3-5"),
        }
    }
}

/// Engine type of an imported vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineType {
    Gasoline,
    Diesel,
    Hybrid,
    Electric,
}

impl EngineType {
    pub fn from_raw(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "gasoline" => Some(Self::Gasoline),
            "diesel" => Some(Self::Diesel),
            "hybrid" => Some(Self::Hybrid),
            "electric" => Some(Self::Electric),
            _ => None,
        }
    }
}

impl std::fmt::Display for EngineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gasoline => write!(f, "gasoline"),
            Self::Diesel => write!(f, "diesel"),
            Self::Hybrid => write!(f, "hybrid"),
            Self::Electric => write!(f, "electric"),
        }
    }
}

/// Purchase region. Selects fixed delivery/agent fee constants only; it
/// never enters the tariff formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    China,
    Korea,
}

impl Region {
    pub fn from_raw(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "china" => Some(Self::China),
            "korea" => Some(Self::Korea),
            _ => None,
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::China => write!(f, "china"),
            Self::Korea => write!(f, "korea"),
        }
    }
}

/// Currency a declared price may be supplied in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    Rub,
    Cny,
    Krw,
}

impl Currency {
    pub fn from_raw(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "rub" => Some(Self::Rub),
            "cny" => Some(Self::Cny),
            "krw" => Some(Self::Krw),
            _ => None,
        }
    }
}

/// Named supplementary amount added to the aggregate total (agent
/// commission, port handling, domestic delivery and the like).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraFee {
    pub label: String,
    pub amount_rub: f64,
}

/// Validated vehicle profile.
///
/// Built once per calculation request and never mutated afterwards; a new
/// profile is constructed for every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleProfile {
    pub age: VehicleAge,
    pub engine_type: EngineType,
    /// Engine displacement in cc. 0 only for electric vehicles.
    pub engine_capacity_cc: f64,
    pub engine_power_hp: f64,
    /// Declared price, already normalized to rubles.
    pub price_rub: f64,
    pub region: Option<Region>,
    /// Supplementary amounts in display order.
    pub extra_fees_rub: Vec<ExtraFee>,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_accepts_known_spellings() {
        assert_eq!(VehicleAge::from_raw("under_3"), Some(VehicleAge::Under3));
        assert_eq!(VehicleAge::from_raw(" Under 3 "), Some(VehicleAge::Under3));
        assert_eq!(VehicleAge::from_raw("3-5"), Some(VehicleAge::ThreeTo5));
        assert_eq!(VehicleAge::from_raw("3 to 5"), Some(VehicleAge::ThreeTo5));
        assert_eq!(VehicleAge::from_raw("invalid"), None);
    }

    #[test]
    fn engine_type_is_case_insensitive() {
        assert_eq!(EngineType::from_raw("GASOLINE"), Some(EngineType::Gasoline));
        assert_eq!(EngineType::from_raw("Diesel"), Some(EngineType::Diesel));
        assert_eq!(EngineType::from_raw("steam"), None);
    }

    #[test]
    fn region_parses() {
        assert_eq!(Region::from_raw("korea"), Some(Region::Korea));
        assert_eq!(Region::from_raw("japan"), None);
    }

    #[test]
    fn age_display() {
        assert_eq!(VehicleAge::Under3.to_string(), "under 3");
        assert_eq!(VehicleAge::ThreeTo5.to_string(), "3-5");
    }
}
