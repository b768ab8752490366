//! Customs tariff table
//!
//! Static configuration of thresholds, rates and factors driving every
//! calculation. Loaded once at process start, shared read-only, and
//! changed only via redeployment. All thresholds are total orders over
//! non-overlapping ranges; [`TariffTable::validate`] enforces this.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::vehicle::{EngineType, Region, VehicleAge};
use crate::shared::errors::{CustomsError, CustomsResult};

/// One step of the clearance fee schedule. `price_ceiling_rub = None`
/// marks the unbounded top tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClearanceTier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_ceiling_rub: Option<f64>,
    pub fee_rub: f64,
}

/// Capacity-banded recycling factors. Bands without an explicit value
/// fall back to `default`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityBands {
    pub default: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band_3001_3500: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band_over_3501: Option<f64>,
}

/// Recycling factor for one (age, engine type) cell: a flat scalar or a
/// capacity-banded set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecyclingFactor {
    Flat(f64),
    Banded(CapacityBands),
}

impl RecyclingFactor {
    /// Select the factor for a displacement. Upper boundaries are
    /// inclusive: above 3501 takes the top band, 3001..=3500 the middle
    /// one, everything else the default.
    pub fn for_capacity(&self, capacity_cc: f64) -> f64 {
        match self {
            RecyclingFactor::Flat(factor) => *factor,
            RecyclingFactor::Banded(bands) => {
                if capacity_cc > 3501.0 {
                    bands.band_over_3501.unwrap_or(bands.default)
                } else if (3001.0..=3500.0).contains(&capacity_cc) {
                    bands.band_3001_3500.unwrap_or(bands.default)
                } else {
                    bands.default
                }
            }
        }
    }
}

/// Recycling fee configuration: a fixed base amount (already RUB, never
/// currency-converted) times a category factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecyclingConfig {
    pub base_rub: f64,
    pub factors: BTreeMap<VehicleAge, BTreeMap<EngineType, RecyclingFactor>>,
}

/// Price bracket for the under-3 duty formula. `max_cost_eur = None`
/// marks the unbounded top bracket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DutyBracket {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cost_eur: Option<f64>,
    /// Percent of the EUR value, e.g. 48.0 for 48%.
    pub percent_of_value: f64,
    /// Per-cc floor in EUR.
    pub min_rate_per_cc_eur: f64,
}

/// Capacity band for the 3-5 duty formula. The selected rate applies to
/// the entire displacement; bands do not accumulate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DutyRateBand {
    pub min_capacity_cc: f64,
    pub rate_per_cc_eur: f64,
}

/// Currency conversion rates. Passed explicitly as part of the table; the
/// engine never reads rates from ambient process state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRates {
    pub eur_to_rub: f64,
    pub usd_to_rub: f64,
    pub cny_to_rub: f64,
    pub krw_to_rub: f64,
}

impl Default for CurrencyRates {
    fn default() -> Self {
        Self {
            eur_to_rub: 92.908,
            usd_to_rub: 92.0,
            cny_to_rub: 11.0,
            krw_to_rub: 0.07,
        }
    }
}

/// Fixed per-region delivery/agent fee constants. They only feed the
/// aggregate total and never enter the duty or fee formulas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionFees {
    /// Overseas agent work, denominated in USD.
    pub agent_usd: f64,
    /// Port-side handling, already RUB.
    pub port_rub: f64,
}

/// The full tariff table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TariffTable {
    pub min_vehicle_price_rub: f64,
    pub clearance_fee_schedule: Vec<ClearanceTier>,
    pub recycling: RecyclingConfig,
    pub duty_brackets_under3: Vec<DutyBracket>,
    pub duty_rate_bands_3to5: Vec<DutyRateBand>,
    pub excise_rate_by_engine_type: BTreeMap<EngineType, f64>,
    pub rates: CurrencyRates,
    pub region_fees: BTreeMap<Region, RegionFees>,
}

impl TariffTable {
    /// Clearance fee for a declared price: the first tier whose ceiling is
    /// >= the price (inclusive boundary), with the unbounded tier as
    /// fallback. Total over all non-negative prices.
    pub fn clearance_fee_for(&self, price_rub: f64) -> CustomsResult<f64> {
        for tier in &self.clearance_fee_schedule {
            match tier.price_ceiling_rub {
                Some(ceiling) if price_rub <= ceiling => return Ok(tier.fee_rub),
                None => return Ok(tier.fee_rub),
                _ => {}
            }
        }
        // A schedule without an unbounded tier is rejected by validate(),
        // but the lookup stays total for any schedule that slips through.
        self.clearance_fee_schedule
            .last()
            .map(|tier| tier.fee_rub)
            .ok_or_else(|| CustomsError::Configuration("clearance fee schedule is empty".into()))
    }

    /// Recycling factor entry for an (age, engine type) cell.
    pub fn recycling_factor(
        &self,
        age: VehicleAge,
        engine: EngineType,
    ) -> CustomsResult<RecyclingFactor> {
        self.recycling
            .factors
            .get(&age)
            .and_then(|by_engine| by_engine.get(&engine))
            .copied()
            .ok_or_else(|| CustomsError::MissingTariff {
                entry: "recycling factor",
                key: format!("{age}/{engine}"),
            })
    }

    /// Excise rate in RUB per horsepower.
    pub fn excise_rate(&self, engine: EngineType) -> CustomsResult<f64> {
        self.excise_rate_by_engine_type
            .get(&engine)
            .copied()
            .ok_or_else(|| CustomsError::MissingTariff {
                entry: "excise rate",
                key: engine.to_string(),
            })
    }

    /// Duty bracket for an EUR cost (under-3 path): the first bracket
    /// whose ceiling is >= the cost; the last bracket doubles as the
    /// fallback for boundary edge cases.
    pub fn duty_bracket_under3(&self, cost_eur: f64) -> CustomsResult<&DutyBracket> {
        for bracket in &self.duty_brackets_under3 {
            match bracket.max_cost_eur {
                Some(ceiling) if cost_eur <= ceiling => return Ok(bracket),
                None => return Ok(bracket),
                _ => {}
            }
        }
        self.duty_brackets_under3
            .last()
            .ok_or_else(|| CustomsError::Configuration("under-3 duty brackets are empty".into()))
    }

    /// Per-cc duty rate for a displacement (3-5 path): the rate of the
    /// highest band whose threshold the capacity reaches. Flat, not
    /// progressive.
    pub fn duty_rate_3to5(&self, capacity_cc: f64) -> CustomsResult<f64> {
        let first = self
            .duty_rate_bands_3to5
            .first()
            .ok_or_else(|| CustomsError::Configuration("3-5 duty rate bands are empty".into()))?;
        let mut selected = first.rate_per_cc_eur;
        for band in &self.duty_rate_bands_3to5 {
            if capacity_cc >= band.min_capacity_cc {
                selected = band.rate_per_cc_eur;
            }
        }
        Ok(selected)
    }

    /// Fixed fee constants for a purchase region.
    pub fn region_fees(&self, region: Region) -> CustomsResult<RegionFees> {
        self.region_fees
            .get(&region)
            .copied()
            .ok_or_else(|| CustomsError::MissingTariff {
                entry: "region fees",
                key: region.to_string(),
            })
    }

    /// Check the structural invariants: every threshold sequence is
    /// strictly ascending and every valid input matches exactly one
    /// bracket. Run once at load time.
    pub fn validate(&self) -> CustomsResult<()> {
        check_ceilings(
            "clearance fee schedule",
            self.clearance_fee_schedule
                .iter()
                .map(|tier| tier.price_ceiling_rub),
        )?;
        check_ceilings(
            "under-3 duty brackets",
            self.duty_brackets_under3
                .iter()
                .map(|bracket| bracket.max_cost_eur),
        )?;

        let bands = &self.duty_rate_bands_3to5;
        match bands.first() {
            None => {
                return Err(CustomsError::Configuration(
                    "3-5 duty rate bands are empty".into(),
                ))
            }
            Some(first) if first.min_capacity_cc != 0.0 => {
                return Err(CustomsError::Configuration(
                    "3-5 duty rate bands must start at 0 cc".into(),
                ))
            }
            _ => {}
        }
        for pair in bands.windows(2) {
            if pair[1].min_capacity_cc <= pair[0].min_capacity_cc {
                return Err(CustomsError::Configuration(
                    "3-5 duty rate bands are not strictly ascending".into(),
                ));
            }
        }

        if self.rates.eur_to_rub <= 0.0
            || self.rates.usd_to_rub <= 0.0
            || self.rates.cny_to_rub <= 0.0
            || self.rates.krw_to_rub <= 0.0
        {
            return Err(CustomsError::Configuration(
                "currency rates must be positive".into(),
            ));
        }
        if self.recycling.base_rub <= 0.0 {
            return Err(CustomsError::Configuration(
                "recycling base amount must be positive".into(),
            ));
        }

        Ok(())
    }
}

/// An ascending sequence of optional ceilings must have strictly
/// increasing finite values and exactly one trailing unbounded entry.
fn check_ceilings(
    name: &str,
    ceilings: impl Iterator<Item = Option<f64>>,
) -> CustomsResult<()> {
    let ceilings: Vec<_> = ceilings.collect();
    match ceilings.last() {
        None => {
            return Err(CustomsError::Configuration(format!("{name} is empty")));
        }
        Some(Some(_)) => {
            return Err(CustomsError::Configuration(format!(
                "{name} must end with an unbounded tier"
            )));
        }
        Some(None) => {}
    }
    let finite = &ceilings[..ceilings.len() - 1];
    for ceiling in finite {
        if ceiling.is_none() {
            return Err(CustomsError::Configuration(format!(
                "{name} has an unbounded tier before the last entry"
            )));
        }
    }
    for pair in finite.windows(2) {
        if pair[1] <= pair[0] {
            return Err(CustomsError::Configuration(format!(
                "{name} ceilings are not strictly ascending"
            )));
        }
    }
    Ok(())
}

impl Default for TariffTable {
    /// Production tariff values, current as of the last redeployment.
    fn default() -> Self {
        let banded_under3 = RecyclingFactor::Banded(CapacityBands {
            default: 0.17,
            band_3001_3500: None,
            band_over_3501: Some(137.11),
        });
        let banded_3to5 = RecyclingFactor::Banded(CapacityBands {
            default: 0.26,
            band_3001_3500: Some(164.84),
            band_over_3501: Some(180.24),
        });

        let mut factors = BTreeMap::new();
        factors.insert(
            VehicleAge::Under3,
            BTreeMap::from([
                (EngineType::Gasoline, banded_under3),
                (EngineType::Diesel, banded_under3),
                (EngineType::Hybrid, banded_under3),
                (EngineType::Electric, RecyclingFactor::Flat(0.17)),
            ]),
        );
        factors.insert(
            VehicleAge::ThreeTo5,
            BTreeMap::from([
                (EngineType::Gasoline, banded_3to5),
                (EngineType::Diesel, banded_3to5),
                (EngineType::Hybrid, banded_3to5),
                (EngineType::Electric, RecyclingFactor::Flat(0.26)),
            ]),
        );

        Self {
            min_vehicle_price_rub: 10_000.0,
            clearance_fee_schedule: vec![
                ClearanceTier { price_ceiling_rub: Some(200_000.0), fee_rub: 1_067.0 },
                ClearanceTier { price_ceiling_rub: Some(450_000.0), fee_rub: 2_134.0 },
                ClearanceTier { price_ceiling_rub: Some(1_200_000.0), fee_rub: 4_269.0 },
                ClearanceTier { price_ceiling_rub: Some(2_700_000.0), fee_rub: 11_746.0 },
                ClearanceTier { price_ceiling_rub: Some(4_200_000.0), fee_rub: 16_524.0 },
                ClearanceTier { price_ceiling_rub: Some(5_500_000.0), fee_rub: 21_344.0 },
                ClearanceTier { price_ceiling_rub: Some(7_000_000.0), fee_rub: 27_540.0 },
                ClearanceTier { price_ceiling_rub: None, fee_rub: 30_000.0 },
            ],
            recycling: RecyclingConfig {
                base_rub: 20_000.0,
                factors,
            },
            duty_brackets_under3: vec![
                DutyBracket { max_cost_eur: Some(8_500.0), percent_of_value: 54.0, min_rate_per_cc_eur: 2.5 },
                DutyBracket { max_cost_eur: Some(16_700.0), percent_of_value: 48.0, min_rate_per_cc_eur: 3.5 },
                DutyBracket { max_cost_eur: Some(42_300.0), percent_of_value: 48.0, min_rate_per_cc_eur: 5.5 },
                DutyBracket { max_cost_eur: Some(84_500.0), percent_of_value: 48.0, min_rate_per_cc_eur: 7.5 },
                DutyBracket { max_cost_eur: Some(169_000.0), percent_of_value: 48.0, min_rate_per_cc_eur: 15.0 },
                DutyBracket { max_cost_eur: None, percent_of_value: 48.0, min_rate_per_cc_eur: 20.0 },
            ],
            duty_rate_bands_3to5: vec![
                DutyRateBand { min_capacity_cc: 0.0, rate_per_cc_eur: 1.5 },
                DutyRateBand { min_capacity_cc: 1_001.0, rate_per_cc_eur: 1.7 },
                DutyRateBand { min_capacity_cc: 1_501.0, rate_per_cc_eur: 2.7 },
                DutyRateBand { min_capacity_cc: 1_801.0, rate_per_cc_eur: 2.7 },
                DutyRateBand { min_capacity_cc: 2_301.0, rate_per_cc_eur: 3.0 },
                DutyRateBand { min_capacity_cc: 3_001.0, rate_per_cc_eur: 3.6 },
            ],
            excise_rate_by_engine_type: BTreeMap::from([
                (EngineType::Gasoline, 58.0),
                (EngineType::Diesel, 58.0),
                (EngineType::Hybrid, 58.0),
                (EngineType::Electric, 0.0),
            ]),
            rates: CurrencyRates::default(),
            region_fees: BTreeMap::from([
                (Region::China, RegionFees { agent_usd: 4_100.0, port_rub: 50_000.0 }),
                (Region::Korea, RegionFees { agent_usd: 2_500.0, port_rub: 150_000.0 }),
            ]),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
