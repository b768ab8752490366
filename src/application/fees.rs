//! Fee calculators
//!
//! Four independent pure functions. Each reads its slice of the tariff
//! table and returns the amount together with a derivation trace; the
//! trace is also logged for auditing, mirroring what ends up in the
//! result.

use tracing::info;

use crate::domain::calculation::FeeLine;
use crate::domain::tariff::TariffTable;
use crate::domain::vehicle::{VehicleAge, VehicleProfile};
use crate::shared::errors::CustomsResult;

/// Customs clearance fee: a step function of the declared price.
pub fn clearance_fee(table: &TariffTable, price_rub: f64) -> CustomsResult<FeeLine> {
    let fee_rub = table.clearance_fee_for(price_rub)?;
    info!(price_rub, fee_rub, "customs clearance fee");
    Ok(FeeLine::new(
        fee_rub,
        format!("clearance fee for price {price_rub:.2} RUB: {fee_rub:.2} RUB"),
    ))
}

/// Recycling fee: fixed base amount times a category-dependent factor.
pub fn recycling_fee(table: &TariffTable, profile: &VehicleProfile) -> CustomsResult<FeeLine> {
    let factor = table
        .recycling_factor(profile.age, profile.engine_type)?
        .for_capacity(profile.engine_capacity_cc);
    let base_rub = table.recycling.base_rub;
    let fee_rub = base_rub * factor;
    info!(base_rub, factor, fee_rub, "recycling fee");
    Ok(FeeLine::new(
        fee_rub,
        format!("recycling fee: base {base_rub:.0} RUB x factor {factor} = {fee_rub:.2} RUB"),
    ))
}

/// Excise: engine power times a per-horsepower rate. Gating by age
/// bracket is the aggregator's concern.
pub fn excise(table: &TariffTable, profile: &VehicleProfile) -> CustomsResult<FeeLine> {
    let rate = table.excise_rate(profile.engine_type)?;
    let fee_rub = profile.engine_power_hp * rate;
    info!(power_hp = profile.engine_power_hp, rate, fee_rub, "excise");
    Ok(FeeLine::new(
        fee_rub,
        format!(
            "excise: {} hp x {rate} RUB/hp = {fee_rub:.2} RUB",
            profile.engine_power_hp
        ),
    ))
}

/// Customs duty. Two distinct algorithms selected by age bracket.
pub fn customs_duty(table: &TariffTable, profile: &VehicleProfile) -> CustomsResult<FeeLine> {
    match profile.age {
        VehicleAge::Under3 => duty_under3(table, profile),
        VehicleAge::ThreeTo5 => duty_3to5(table, profile),
    }
}

/// Under-3 path: value-percent duty with a per-cc floor, computed in EUR
/// and converted back.
fn duty_under3(table: &TariffTable, profile: &VehicleProfile) -> CustomsResult<FeeLine> {
    let eur_to_rub = table.rates.eur_to_rub;
    let cost_eur = profile.price_rub / eur_to_rub;
    let bracket = table.duty_bracket_under3(cost_eur)?;

    let percent_eur = bracket.percent_of_value / 100.0 * cost_eur;
    let floor_eur = bracket.min_rate_per_cc_eur * profile.engine_capacity_cc;
    let duty_eur = percent_eur.max(floor_eur);
    let duty_rub = duty_eur * eur_to_rub;

    info!(cost_eur, percent_eur, floor_eur, duty_rub, "customs duty (under 3)");
    Ok(FeeLine::new(
        duty_rub,
        format!(
            "duty (under 3): max({}% x {cost_eur:.2} EUR = {percent_eur:.2} EUR, \
             {} EUR/cc x {} cc = {floor_eur:.2} EUR) = {duty_eur:.2} EUR -> {duty_rub:.2} RUB",
            bracket.percent_of_value, bracket.min_rate_per_cc_eur, profile.engine_capacity_cc
        ),
    ))
}

/// 3-5 path: one flat per-cc rate applied to the entire displacement.
fn duty_3to5(table: &TariffTable, profile: &VehicleProfile) -> CustomsResult<FeeLine> {
    let eur_to_rub = table.rates.eur_to_rub;
    let rate = table.duty_rate_3to5(profile.engine_capacity_cc)?;
    let duty_rub = rate * profile.engine_capacity_cc * eur_to_rub;

    info!(rate, capacity_cc = profile.engine_capacity_cc, duty_rub, "customs duty (3-5)");
    Ok(FeeLine::new(
        duty_rub,
        format!(
            "duty (3-5): {rate} EUR/cc x {} cc x {eur_to_rub} = {duty_rub:.2} RUB",
            profile.engine_capacity_cc
        ),
    ))
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vehicle::EngineType;

    fn sample_profile(age: VehicleAge) -> VehicleProfile {
        VehicleProfile {
            age,
            engine_type: EngineType::Gasoline,
            engine_capacity_cc: 2_000.0,
            engine_power_hp: 150.0,
            price_rub: 1_500_000.0,
            region: None,
            extra_fees_rub: Vec::new(),
        }
    }

    #[test]
    fn clearance_fee_reads_the_schedule() {
        let table = TariffTable::default();
        let line = clearance_fee(&table, 1_500_000.0).unwrap();
        assert_eq!(line.amount_rub, 11_746.0);
        assert!(line.trace.contains("clearance fee"));
    }

    #[test]
    fn excise_is_power_times_rate() {
        let table = TariffTable::default();
        let mut profile = sample_profile(VehicleAge::Under3);
        profile.engine_power_hp = 300.0;
        let line = excise(&table, &profile).unwrap();
        // 300 hp x 58 RUB/hp
        assert_eq!(line.amount_rub, 17_400.0);
    }

    #[test]
    fn excise_rate_is_zero_for_electric() {
        let table = TariffTable::default();
        let mut profile = sample_profile(VehicleAge::Under3);
        profile.engine_type = EngineType::Electric;
        profile.engine_capacity_cc = 0.0;
        let line = excise(&table, &profile).unwrap();
        assert_eq!(line.amount_rub, 0.0);
    }

    #[test]
    fn duty_under3_takes_the_percent_amount_when_higher() {
        let table = TariffTable::default();
        let mut profile = sample_profile(VehicleAge::Under3);
        // 1,500,000 RUB / 92.908 = 16,145.0 EUR -> bracket 8,501..16,700
        // percent: 48% x 16,145.0 = 7,749.6 EUR; floor: 3.5 x 2,000 = 7,000 EUR
        profile.price_rub = 1_500_000.0;
        let line = customs_duty(&table, &profile).unwrap();
        let cost_eur = 1_500_000.0 / 92.908;
        let expected = 0.48 * cost_eur * 92.908;
        assert!((line.amount_rub - expected).abs() < 1e-6);
    }

    #[test]
    fn duty_under3_never_goes_below_the_per_cc_floor() {
        let table = TariffTable::default();
        let mut profile = sample_profile(VehicleAge::Under3);
        profile.engine_capacity_cc = 4_000.0;
        profile.price_rub = 5_000_000.0;
        let line = customs_duty(&table, &profile).unwrap();
        // Bracket 42,301..84,500: floor 7.5 EUR/cc x 4,000 cc = 30,000 EUR
        let floor_rub = 30_000.0 * 92.908;
        assert!(line.amount_rub >= floor_rub - 1e-6);
        assert!((line.amount_rub - floor_rub).abs() < 1e-6);
    }

    #[test]
    fn duty_floor_property_holds_across_brackets() {
        let table = TariffTable::default();
        for price in [500_000.0, 1_500_000.0, 3_000_000.0, 7_000_000.0, 20_000_000.0] {
            for capacity in [1_000.0, 2_500.0, 4_200.0] {
                let mut profile = sample_profile(VehicleAge::Under3);
                profile.price_rub = price;
                profile.engine_capacity_cc = capacity;
                let line = customs_duty(&table, &profile).unwrap();
                let cost_eur = price / table.rates.eur_to_rub;
                let bracket = table.duty_bracket_under3(cost_eur).unwrap();
                let floor_rub =
                    bracket.min_rate_per_cc_eur * capacity * table.rates.eur_to_rub;
                assert!(
                    line.amount_rub >= floor_rub - 1e-6,
                    "duty below floor at price {price}, capacity {capacity}"
                );
            }
        }
    }

    #[test]
    fn duty_3to5_applies_one_flat_rate_to_the_whole_displacement() {
        let table = TariffTable::default();
        let profile = sample_profile(VehicleAge::ThreeTo5);
        let line = customs_duty(&table, &profile).unwrap();
        // 2,000 cc -> 1,501 band, 2.7 EUR/cc
        let expected = 2.7 * 2_000.0 * 92.908;
        assert!((line.amount_rub - expected).abs() < 1e-6);
    }

    #[test]
    fn recycling_fee_uses_the_band_factor() {
        let table = TariffTable::default();
        let mut profile = sample_profile(VehicleAge::Under3);
        profile.engine_capacity_cc = 4_000.0;
        let line = recycling_fee(&table, &profile).unwrap();
        // base 20,000 x over-3501 factor 137.11
        assert!((line.amount_rub - 2_742_200.0).abs() < 1e-6);
    }
}
