//! Raw input validation
//!
//! Turns untyped field values from a conversational front-end (or any
//! other driver) into a typed [`VehicleProfile`]. Rules are applied per
//! field and the first violated rule is reported; nothing else is
//! inspected. No side effects beyond advisory logging.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::calculation::labels;
use crate::domain::tariff::TariffTable;
use crate::domain::vehicle::{
    Currency, EngineType, ExtraFee, Region, VehicleAge, VehicleProfile,
};
use crate::shared::errors::{CustomsError, CustomsResult};

/// A nonzero work cost below this threshold is accepted but flagged as
/// suspicious.
const SUSPICIOUS_WORK_COST_RUB: f64 = 10_000.0;

/// Untyped field values as supplied by a front-end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawVehicleInput {
    pub age: String,
    pub engine_type: String,
    /// Displacement in cc. Ignored for electric vehicles.
    #[serde(default)]
    pub engine_capacity: String,
    pub engine_power: String,
    pub price: String,
    /// Currency of `price` (rub, cny, krw). Defaults to RUB.
    #[serde(default)]
    pub currency: Option<String>,
    /// Purchase region (china, korea). Enables the fixed region fees.
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub overseas_work: Option<String>,
    #[serde(default)]
    pub agent_fee: Option<String>,
    #[serde(default)]
    pub port_work: Option<String>,
    #[serde(default)]
    pub delivery: Option<String>,
}

/// Validate raw fields into a profile, converting a non-RUB price to
/// rubles before the minimum-price rule runs.
pub fn validate(raw: &RawVehicleInput, table: &TariffTable) -> CustomsResult<VehicleProfile> {
    let age = VehicleAge::from_raw(&raw.age).ok_or_else(|| CustomsError::InvalidInput {
        field: "age",
        reason: format!("unknown age bracket {:?}; expected under_3 or 3-5", raw.age),
    })?;

    let engine_type = parse_engine_type(&raw.engine_type)?;

    // Electric drivetrains have no displacement; the field is set rather
    // than read.
    let engine_capacity_cc = if engine_type == EngineType::Electric {
        0.0
    } else {
        let capacity = parse_number("engine_capacity", &raw.engine_capacity)?;
        if capacity <= 0.0 {
            return Err(invalid("engine_capacity", "displacement must be greater than 0"));
        }
        capacity
    };

    let engine_power_hp = parse_number("engine_power", &raw.engine_power)?;
    if engine_power_hp <= 0.0 {
        return Err(invalid("engine_power", "power must be greater than 0"));
    }

    let currency = match raw.currency.as_deref() {
        None => Currency::Rub,
        Some(value) => Currency::from_raw(value).ok_or_else(|| CustomsError::InvalidInput {
            field: "currency",
            reason: format!("unknown currency {value:?}; expected rub, cny or krw"),
        })?,
    };
    let region = match raw.region.as_deref() {
        None => None,
        Some(value) => Some(Region::from_raw(value).ok_or_else(|| CustomsError::InvalidInput {
            field: "region",
            reason: format!("unknown region {value:?}; expected china or korea"),
        })?),
    };

    let price = parse_number("price", &raw.price)?;
    let price_rub = convert_price(price, currency, region, table)?;
    if price_rub < table.min_vehicle_price_rub {
        return Err(CustomsError::InvalidInput {
            field: "price",
            reason: format!(
                "price {:.2} RUB is below the {:.0} RUB minimum",
                price_rub, table.min_vehicle_price_rub
            ),
        });
    }

    let extra_fees_rub = collect_extra_fees(raw, region, table)?;

    Ok(VehicleProfile {
        age,
        engine_type,
        engine_capacity_cc,
        engine_power_hp,
        price_rub,
        region,
        extra_fees_rub,
    })
}

fn parse_engine_type(raw: &str) -> CustomsResult<EngineType> {
    let mut value = raw.trim().to_lowercase();
    if value == "galosine" {
        // Recurring front-end typo; corrected silently.
        value = "gasoline".to_string();
    }
    EngineType::from_raw(&value).ok_or_else(|| CustomsError::InvalidInput {
        field: "engine_type",
        reason: format!(
            "unknown engine type {raw:?}; expected gasoline, diesel, hybrid or electric"
        ),
    })
}

/// Convert a declared price to rubles. A non-RUB price requires a region
/// that matches the currency (CNY for China, KRW for Korea); conversion
/// happens exactly once, upstream of the minimum-price check.
fn convert_price(
    price: f64,
    currency: Currency,
    region: Option<Region>,
    table: &TariffTable,
) -> CustomsResult<f64> {
    let rates = &table.rates;
    match currency {
        Currency::Rub => Ok(price),
        Currency::Cny => match region {
            Some(Region::China) => Ok(price * rates.cny_to_rub),
            Some(other) => Err(invalid(
                "currency",
                &format!("CNY prices require region china, got {other}"),
            )),
            None => Err(invalid("region", "required to convert a CNY price")),
        },
        Currency::Krw => match region {
            Some(Region::Korea) => Ok(price * rates.krw_to_rub),
            Some(other) => Err(invalid(
                "currency",
                &format!("KRW prices require region korea, got {other}"),
            )),
            None => Err(invalid("region", "required to convert a KRW price")),
        },
    }
}

/// Resolve the supplementary fee lines in display order. When a region is
/// supplied, the overseas and port work amounts come from the table's
/// fixed region constants (USD part converted once) instead of the raw
/// fields.
fn collect_extra_fees(
    raw: &RawVehicleInput,
    region: Option<Region>,
    table: &TariffTable,
) -> CustomsResult<Vec<ExtraFee>> {
    let (overseas_work, port_work) = match region {
        Some(region) => {
            let fees = table.region_fees(region)?;
            (fees.agent_usd * table.rates.usd_to_rub, fees.port_rub)
        }
        None => (
            parse_work_cost("overseas_work", raw.overseas_work.as_deref())?,
            parse_work_cost("port_work", raw.port_work.as_deref())?,
        ),
    };
    let agent_fee = parse_fee("agent_fee", raw.agent_fee.as_deref())?;
    let delivery = parse_fee("delivery", raw.delivery.as_deref())?;

    Ok(vec![
        ExtraFee { label: labels::OVERSEAS_WORK.to_string(), amount_rub: overseas_work },
        ExtraFee { label: labels::AGENT_FEE.to_string(), amount_rub: agent_fee },
        ExtraFee { label: labels::PORT_WORK.to_string(), amount_rub: port_work },
        ExtraFee { label: labels::DELIVERY.to_string(), amount_rub: delivery },
    ])
}

fn parse_work_cost(field: &'static str, raw: Option<&str>) -> CustomsResult<f64> {
    let value = parse_fee(field, raw)?;
    if value > 0.0 && value < SUSPICIOUS_WORK_COST_RUB {
        // Advisory only; the calculation proceeds unchanged.
        warn!(field, value_rub = value, "work cost looks unrealistically low");
    }
    Ok(value)
}

fn parse_fee(field: &'static str, raw: Option<&str>) -> CustomsResult<f64> {
    let Some(raw) = raw else { return Ok(0.0) };
    if raw.trim().is_empty() {
        return Ok(0.0);
    }
    let value = parse_number(field, raw)?;
    if value < 0.0 {
        return Err(invalid(field, "must not be negative"));
    }
    Ok(value)
}

/// Parse a numeric field, accepting a decimal comma and digit-group
/// spaces.
fn parse_number(field: &'static str, raw: &str) -> CustomsResult<f64> {
    let cleaned = raw.trim().replace(' ', "").replace(',', ".");
    cleaned
        .parse::<f64>()
        .map_err(|_| CustomsError::InvalidInput {
            field,
            reason: format!("{raw:?} is not a number"),
        })
}

fn invalid(field: &'static str, reason: &str) -> CustomsError {
    CustomsError::InvalidInput {
        field,
        reason: reason.to_string(),
    }
}

// ── Tests ──────────────────────────────────────────────────────
