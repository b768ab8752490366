//! Customs calculation service
//!
//! Aggregates the independent fee calculators into an itemized result.
//! Dispatches by age bracket: the excise line is computed for under-3
//! vehicles and fixed at 0 for the 3-5 bracket.

use std::sync::Arc;

use tracing::info;

use crate::application::fees;
use crate::application::validation::{self, RawVehicleInput};
use crate::domain::calculation::{labels, CalculationResult, FeeLine};
use crate::domain::tariff::TariffTable;
use crate::domain::vehicle::{VehicleAge, VehicleProfile};
use crate::shared::errors::CustomsResult;

/// Service computing the full import cost of a vehicle.
///
/// Stateless beyond the shared read-only tariff table; safe for
/// unlimited concurrent use.
pub struct CustomsCalculator {
    table: Arc<TariffTable>,
}

impl CustomsCalculator {
    pub fn new(table: Arc<TariffTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &TariffTable {
        &self.table
    }

    /// Validate raw front-end fields into a typed profile.
    pub fn validate(&self, raw: &RawVehicleInput) -> CustomsResult<VehicleProfile> {
        validation::validate(raw, &self.table)
    }

    /// Compute the itemized cost breakdown for a validated profile.
    pub fn calculate(&self, profile: &VehicleProfile) -> CustomsResult<CalculationResult> {
        let duty = fees::customs_duty(&self.table, profile)?;
        let recycling = fees::recycling_fee(&self.table, profile)?;
        let clearance = fees::clearance_fee(&self.table, profile.price_rub)?;
        let excise = match profile.age {
            VehicleAge::Under3 => fees::excise(&self.table, profile)?,
            // Not levied on the older bracket; the line stays at 0.
            VehicleAge::ThreeTo5 => FeeLine::new(0.0, "excise: not levied on vehicles aged 3-5"),
        };

        let extras: f64 = profile.extra_fees_rub.iter().map(|fee| fee.amount_rub).sum();
        let total = profile.price_rub
            + extras
            + duty.amount_rub
            + recycling.amount_rub
            + clearance.amount_rub
            + excise.amount_rub;

        let mut result = CalculationResult::default();
        result.push(labels::VEHICLE_PRICE, profile.price_rub);
        for fee in &profile.extra_fees_rub {
            result.push(fee.label.clone(), fee.amount_rub);
        }
        result.push(labels::CUSTOMS_DUTY, duty.amount_rub);
        result.push(labels::RECYCLING_FEE, recycling.amount_rub);
        result.push(labels::CLEARANCE_FEE, clearance.amount_rub);
        result.push(labels::EXCISE, excise.amount_rub);
        result.push(labels::TOTAL, total);
        result.total_rub = total;

        for line in [duty, recycling, clearance, excise] {
            result.traces.push(line.trace);
        }

        info!(
            total_rub = total,
            age = %profile.age,
            engine = %profile.engine_type,
            "customs calculation complete"
        );
        Ok(result)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vehicle::EngineType;
    use crate::shared::errors::CustomsError;

    fn calculator() -> CustomsCalculator {
        CustomsCalculator::new(Arc::new(TariffTable::default()))
    }

    fn sample_profile(age: VehicleAge) -> VehicleProfile {
        VehicleProfile {
            age,
            engine_type: EngineType::Gasoline,
            engine_capacity_cc: 2_000.0,
            engine_power_hp: 185.0,
            price_rub: 2_000_000.0,
            region: None,
            extra_fees_rub: Vec::new(),
        }
    }

    #[test]
    fn scenario_under3_gasoline_4000cc() {
        let calc = calculator();
        let mut profile = sample_profile(VehicleAge::Under3);
        profile.engine_capacity_cc = 4_000.0;
        profile.engine_power_hp = 300.0;
        profile.price_rub = 5_000_000.0;

        let result = calc.calculate(&profile).unwrap();
        assert_eq!(result.get(labels::EXCISE), Some(17_400.0));
        assert_eq!(result.get(labels::CLEARANCE_FEE), Some(21_344.0));
        let recycling = result.get(labels::RECYCLING_FEE).unwrap();
        assert!((recycling - 2_742_200.0).abs() < 1e-6);
        // Duty: max(48% x ~53,817 EUR, 7.5 EUR/cc x 4,000 cc) = 30,000 EUR
        let duty = result.get(labels::CUSTOMS_DUTY).unwrap();
        assert!((duty - 30_000.0 * 92.908).abs() < 1e-6);
        assert!(
            (10_550_000.0..=10_570_000.0).contains(&result.total_rub),
            "total out of range: {}",
            result.total_rub
        );
    }

    #[test]
    fn scenario_3to5_gasoline_2000cc() {
        let calc = calculator();
        let profile = sample_profile(VehicleAge::ThreeTo5);

        let result = calc.calculate(&profile).unwrap();
        assert_eq!(result.get(labels::EXCISE), Some(0.0));
        assert_eq!(result.get(labels::CLEARANCE_FEE), Some(11_746.0));
        // 1,501 band: 2.7 EUR/cc x 2,000 cc x 92.908
        let duty = result.get(labels::CUSTOMS_DUTY).unwrap();
        assert!((duty - 501_703.2).abs() < 1e-6);
        assert!(
            (2_518_000.0..=2_520_000.0).contains(&result.total_rub),
            "total out of range: {}",
            result.total_rub
        );
    }

    #[test]
    fn excise_is_zero_for_3to5_even_with_a_rated_engine() {
        let calc = calculator();
        let mut profile = sample_profile(VehicleAge::ThreeTo5);
        profile.engine_power_hp = 500.0;
        let result = calc.calculate(&profile).unwrap();
        assert_eq!(result.get(labels::EXCISE), Some(0.0));
    }

    #[test]
    fn line_items_come_in_display_order_and_end_with_total() {
        let calc = calculator();
        let profile = sample_profile(VehicleAge::Under3);
        let result = calc.calculate(&profile).unwrap();
        let order: Vec<_> = result.items.iter().map(|item| item.label.as_str()).collect();
        assert_eq!(order.first(), Some(&labels::VEHICLE_PRICE));
        assert_eq!(order.last(), Some(&labels::TOTAL));
        let duty_at = order.iter().position(|l| *l == labels::CUSTOMS_DUTY).unwrap();
        let excise_at = order.iter().position(|l| *l == labels::EXCISE).unwrap();
        assert!(duty_at < excise_at);
    }

    #[test]
    fn supplementary_fees_enter_the_total() {
        use crate::domain::vehicle::ExtraFee;
        let calc = calculator();
        let mut profile = sample_profile(VehicleAge::ThreeTo5);
        let bare_total = calc.calculate(&profile).unwrap().total_rub;
        profile.extra_fees_rub = vec![
            ExtraFee { label: labels::AGENT_FEE.to_string(), amount_rub: 30_000.0 },
            ExtraFee { label: labels::DELIVERY.to_string(), amount_rub: 45_000.0 },
        ];
        let result = calc.calculate(&profile).unwrap();
        assert!((result.total_rub - bare_total - 75_000.0).abs() < 1e-6);
        assert_eq!(result.get(labels::AGENT_FEE), Some(30_000.0));
    }

    #[test]
    fn calculation_is_deterministic_and_idempotent() {
        let calc = calculator();
        let profile = sample_profile(VehicleAge::Under3);
        let first = calc.calculate(&profile).unwrap();
        let second = calc.calculate(&profile).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_tariff_entry_aborts_the_calculation() {
        let mut table = TariffTable::default();
        table.recycling.factors.clear();
        let calc = CustomsCalculator::new(Arc::new(table));
        let profile = sample_profile(VehicleAge::Under3);
        let err = calc.calculate(&profile).unwrap_err();
        assert!(matches!(err, CustomsError::MissingTariff { .. }));
    }

    #[test]
    fn traces_cover_every_computed_fee() {
        let calc = calculator();
        let profile = sample_profile(VehicleAge::Under3);
        let result = calc.calculate(&profile).unwrap();
        assert_eq!(result.traces.len(), 4);
        assert!(result.traces.iter().any(|t| t.starts_with("duty")));
        assert!(result.traces.iter().any(|t| t.starts_with("recycling")));
    }

    #[test]
    fn validate_and_calculate_work_end_to_end() {
        let calc = calculator();
        let raw = RawVehicleInput {
            age: "3-5".to_string(),
            engine_type: "gasoline".to_string(),
            engine_capacity: "2000".to_string(),
            engine_power: "185".to_string(),
            price: "2000000".to_string(),
            ..RawVehicleInput::default()
        };
        let profile = calc.validate(&raw).unwrap();
        let result = calc.calculate(&profile).unwrap();
        assert!((2_518_000.0..=2_520_000.0).contains(&result.total_rub));
    }
}
