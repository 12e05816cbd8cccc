//! What-if simulator: re-derive the funnel under overridden conversion rates
//! and deal value, holding capacity fixed.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::calculator::{ceil_div_percent, DerivedFunnel, DEFAULT_MANUAL_VALUE};

// Slider bounds for the UI. The engine itself accepts any value.
pub const LEAD_RATE_PERCENT_RANGE: RangeInclusive<f64> = 10.0..=70.0;
pub const CLOSE_RATE_PERCENT_RANGE: RangeInclusive<f64> = 10.0..=70.0;
pub const RATE_PERCENT_STEP: f64 = 5.0;
pub const DEAL_VALUE_RANGE: RangeInclusive<f64> = 1_000.0..=50_000.0;
pub const DEAL_VALUE_STEP: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationOverrides {
    pub lead_to_evaluation_rate_percent: f64,
    pub evaluation_to_closing_rate_percent: f64,
    pub simulated_deal_value: f64,
}

impl Default for SimulationOverrides {
    fn default() -> Self {
        Self {
            lead_to_evaluation_rate_percent: 30.0,
            evaluation_to_closing_rate_percent: 30.0,
            simulated_deal_value: DEFAULT_MANUAL_VALUE,
        }
    }
}

impl SimulationOverrides {
    /// Overrides that reproduce the given funnel exactly.
    pub fn from_baseline(baseline: &DerivedFunnel) -> Self {
        Self {
            lead_to_evaluation_rate_percent: f64::from(baseline.lead_to_evaluation_rate.percent()),
            evaluation_to_closing_rate_percent: f64::from(
                baseline.evaluation_to_closing_rate.percent(),
            ),
            simulated_deal_value: baseline.average_deal_value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulatedFunnel {
    pub contacts: u64,
    pub evaluations: u64,
    pub closings: u64,
    pub revenue: f64,
    pub revenue_delta: f64,
    /// 0 when the baseline revenue is 0.
    pub revenue_percent_change: f64,
}

/// Run the simulation for a fixed capacity against a baseline revenue.
///
/// A zero rate yields zero evaluations/contacts; a zero baseline reports no
/// percent change. Neither is an error.
pub fn simulate(
    capacity: u64,
    overrides: &SimulationOverrides,
    baseline_monthly_revenue: f64,
) -> SimulatedFunnel {
    let closings = capacity;
    let evaluations = ceil_div_percent(closings, overrides.evaluation_to_closing_rate_percent);
    let contacts = ceil_div_percent(evaluations, overrides.lead_to_evaluation_rate_percent);
    let revenue = closings as f64 * overrides.simulated_deal_value;
    let revenue_delta = revenue - baseline_monthly_revenue;
    let revenue_percent_change = if baseline_monthly_revenue == 0.0 {
        0.0
    } else {
        revenue_delta / baseline_monthly_revenue * 100.0
    };

    SimulatedFunnel {
        contacts,
        evaluations,
        closings,
        revenue,
        revenue_delta,
        revenue_percent_change,
    }
}

/// Convenience wrapper: simulate against a derived baseline.
pub fn simulate_against(baseline: &DerivedFunnel, overrides: &SimulationOverrides) -> SimulatedFunnel {
    simulate(baseline.capacity, overrides, baseline.monthly_revenue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funnel::calculator::{DealValueSource, FunnelInputs};
    use crate::funnel::rates::LocationTier;

    fn reference_baseline() -> DerivedFunnel {
        let mut inputs = FunnelInputs::default();
        inputs.location_tier = Some(LocationTier::Small);
        inputs.derive()
    }

    #[test]
    fn reference_simulation() {
        let baseline = reference_baseline();
        let overrides = SimulationOverrides {
            lead_to_evaluation_rate_percent: 50.0,
            evaluation_to_closing_rate_percent: 50.0,
            simulated_deal_value: 20_000.0,
        };
        let sim = simulate_against(&baseline, &overrides);
        assert_eq!(sim.closings, 20);
        assert_eq!(sim.evaluations, 40);
        assert_eq!(sim.contacts, 80);
        assert_eq!(sim.revenue, 400_000.0);
        assert_eq!(sim.revenue_delta, 159_500.0);
        assert!((sim.revenue_percent_change - 66.32).abs() < 0.01);
    }

    #[test]
    fn baseline_overrides_reproduce_baseline() {
        for tier in [None, Some(LocationTier::Small), Some(LocationTier::Medium)] {
            let mut inputs = FunnelInputs::default();
            inputs.location_tier = tier;
            let baseline = inputs.derive();
            let sim = simulate_against(&baseline, &SimulationOverrides::from_baseline(&baseline));
            assert_eq!(sim.revenue, baseline.monthly_revenue);
            assert_eq!(sim.revenue_delta, 0.0);
            assert_eq!(sim.revenue_percent_change, 0.0);
            assert_eq!(sim.evaluations, baseline.evaluations);
            assert_eq!(sim.contacts, baseline.contacts);
        }
    }

    #[test]
    fn zero_baseline_reports_no_percent_change() {
        let mut inputs = FunnelInputs::default();
        inputs.deal_value_source = DealValueSource::ManualValue;
        inputs.manual_value = 0.0;
        let baseline = inputs.derive();
        assert_eq!(baseline.monthly_revenue, 0.0);

        let sim = simulate_against(&baseline, &SimulationOverrides::default());
        assert!(sim.revenue > 0.0);
        assert_eq!(sim.revenue_delta, sim.revenue);
        assert_eq!(sim.revenue_percent_change, 0.0);
    }

    #[test]
    fn zero_rates_yield_zero_counts() {
        let overrides = SimulationOverrides {
            lead_to_evaluation_rate_percent: 0.0,
            evaluation_to_closing_rate_percent: 0.0,
            simulated_deal_value: 5_000.0,
        };
        let sim = simulate(20, &overrides, 100_000.0);
        assert_eq!(sim.evaluations, 0);
        assert_eq!(sim.contacts, 0);
        assert_eq!(sim.closings, 20);
        assert_eq!(sim.revenue, 100_000.0);
    }

    #[test]
    fn zero_lead_rate_only_zeroes_contacts() {
        let overrides = SimulationOverrides {
            lead_to_evaluation_rate_percent: 0.0,
            evaluation_to_closing_rate_percent: 40.0,
            simulated_deal_value: 5_000.0,
        };
        let sim = simulate(20, &overrides, 0.0);
        assert_eq!(sim.evaluations, 50);
        assert_eq!(sim.contacts, 0);
    }

    #[test]
    fn engine_accepts_values_outside_slider_bounds() {
        let overrides = SimulationOverrides {
            lead_to_evaluation_rate_percent: 100.0,
            evaluation_to_closing_rate_percent: 5.0,
            simulated_deal_value: 80_000.0,
        };
        assert!(!CLOSE_RATE_PERCENT_RANGE.contains(&overrides.evaluation_to_closing_rate_percent));
        let sim = simulate(10, &overrides, 0.0);
        assert_eq!(sim.evaluations, 200);
        assert_eq!(sim.contacts, 200);
        assert_eq!(sim.revenue, 800_000.0);
    }

    #[test]
    fn lower_revenue_gives_negative_delta() {
        let baseline = reference_baseline();
        let overrides = SimulationOverrides {
            simulated_deal_value: 6_012.5,
            ..SimulationOverrides::from_baseline(&baseline)
        };
        let sim = simulate_against(&baseline, &overrides);
        assert_eq!(sim.revenue_delta, -120_250.0);
        assert_eq!(sim.revenue_percent_change, -50.0);
    }

    #[test]
    fn default_overrides_sit_inside_slider_bounds() {
        let d = SimulationOverrides::default();
        assert!(LEAD_RATE_PERCENT_RANGE.contains(&d.lead_to_evaluation_rate_percent));
        assert!(CLOSE_RATE_PERCENT_RANGE.contains(&d.evaluation_to_closing_rate_percent));
        assert!(DEAL_VALUE_RANGE.contains(&d.simulated_deal_value));
    }
}
