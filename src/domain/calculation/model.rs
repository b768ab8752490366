//! Calculation result types
//!
//! The itemized, insertion-ordered cost breakdown returned by the
//! aggregator, plus the per-fee derivation traces.

use serde::{Deserialize, Serialize};

/// Stable line-item labels. Usable both as display labels and as test
/// assertion keys.
pub mod labels {
    pub const VEHICLE_PRICE: &str = "Vehicle price (RUB)";
    pub const OVERSEAS_WORK: &str = "Overseas work (RUB)";
    pub const AGENT_FEE: &str = "Agent commission (RUB)";
    pub const PORT_WORK: &str = "Port handling (RUB)";
    pub const DELIVERY: &str = "Domestic delivery (RUB)";
    pub const CUSTOMS_DUTY: &str = "Customs duty (RUB)";
    pub const RECYCLING_FEE: &str = "Recycling fee (RUB)";
    pub const CLEARANCE_FEE: &str = "Customs clearance fee (RUB)";
    pub const EXCISE: &str = "Excise (RUB)";
    pub const TOTAL: &str = "Total (RUB)";
}

/// One computed fee: the amount plus a human-readable derivation trace.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeLine {
    pub amount_rub: f64,
    pub trace: String,
}

impl FeeLine {
    pub fn new(amount_rub: f64, trace: impl Into<String>) -> Self {
        Self {
            amount_rub,
            trace: trace.into(),
        }
    }
}

/// One line of the itemized breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub label: String,
    pub amount_rub: f64,
}

/// Itemized cost breakdown. Insertion order is display order and is
/// preserved end to end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub items: Vec<LineItem>,
    pub total_rub: f64,
    /// Derivation traces collected from the fee calculators.
    pub traces: Vec<String>,
}

impl CalculationResult {
    pub fn push(&mut self, label: impl Into<String>, amount_rub: f64) {
        self.items.push(LineItem {
            label: label.into(),
            amount_rub,
        });
    }

    /// Amount of the line with the given label, if present.
    pub fn get(&self, label: &str) -> Option<f64> {
        self.items
            .iter()
            .find(|item| item.label == label)
            .map(|item| item.amount_rub)
    }
}

// ── Tests ──────────────────────────────────────────────────────
