//! Load-on-open and explicit-save flows for the funnel calculator.
//!
//! Both return a [`FunnelView`]: the operator's inputs, the freshly derived
//! indicators, their display strings and the stored row metadata.

use serde::Serialize;

use crate::core_state::{CoreError, CoreState, OperatorContext};
use crate::db::{self, SnapshotMeta};
use crate::funnel::format::{format_currency, format_number, format_percent};
use crate::funnel::{DerivedFunnel, FunnelInputs, SimulatedFunnel, SimulationOverrides};

/// Pre-formatted strings for the dashboard cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelDisplay {
    pub capacity: String,
    pub evaluations: String,
    pub contacts: String,
    pub average_deal_value: String,
    pub monthly_revenue: String,
}

impl From<&DerivedFunnel> for FunnelDisplay {
    fn from(derived: &DerivedFunnel) -> Self {
        Self {
            capacity: format_number(derived.capacity),
            evaluations: format_number(derived.evaluations),
            contacts: format_number(derived.contacts),
            average_deal_value: format_currency(derived.average_deal_value),
            monthly_revenue: format_currency(derived.monthly_revenue),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationDisplay {
    pub revenue: String,
    pub revenue_delta: String,
    pub revenue_percent_change: String,
}

impl From<&SimulatedFunnel> for SimulationDisplay {
    fn from(sim: &SimulatedFunnel) -> Self {
        let delta = format_currency(sim.revenue_delta);
        Self {
            revenue: format_currency(sim.revenue),
            revenue_delta: if sim.revenue_delta.round() > 0.0 {
                format!("+{delta}")
            } else {
                delta
            },
            revenue_percent_change: format_percent(sim.revenue_percent_change),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelView {
    pub inputs: FunnelInputs,
    pub derived: DerivedFunnel,
    pub display: FunnelDisplay,
    /// `None` until the operator saves for the first time.
    pub saved: Option<SnapshotMeta>,
}

impl FunnelView {
    pub fn new(inputs: FunnelInputs, saved: Option<SnapshotMeta>) -> Self {
        let derived = inputs.derive();
        Self {
            display: FunnelDisplay::from(&derived),
            inputs,
            derived,
            saved,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationView {
    pub baseline: DerivedFunnel,
    pub overrides: SimulationOverrides,
    pub simulated: SimulatedFunnel,
    pub display: SimulationDisplay,
}

/// Simulate against the funnel derived from `inputs`. Without overrides the
/// simulation starts from the baseline's own rates and deal value.
pub fn simulate_inputs(
    inputs: &FunnelInputs,
    overrides: Option<SimulationOverrides>,
) -> SimulationView {
    let baseline = inputs.derive();
    let overrides = overrides.unwrap_or_else(|| SimulationOverrides::from_baseline(&baseline));
    let simulated = crate::funnel::simulation::simulate_against(&baseline, &overrides);
    SimulationView {
        baseline,
        overrides,
        display: SimulationDisplay::from(&simulated),
        simulated,
    }
}

/// Load the operator's funnel, falling back to defaults when nothing is stored.
pub fn open_funnel(core: &CoreState, operator: &OperatorContext) -> Result<FunnelView, CoreError> {
    let conn = core.open_db()?;
    match db::load_funnel(&conn, operator.id())? {
        Some((inputs, meta)) => {
            tracing::debug!(operator_id = operator.id(), revision = meta.revision, "Funnel loaded");
            Ok(FunnelView::new(inputs, Some(meta)))
        }
        None => {
            tracing::debug!(operator_id = operator.id(), "No stored funnel, using defaults");
            Ok(FunnelView::new(FunnelInputs::default(), None))
        }
    }
}

/// Validate and upsert the operator's inputs.
///
/// Rejected with `SaveInProgress` while another save for the same operator
/// runs. On failure nothing is committed; the caller still holds its inputs
/// and may save again.
pub fn save_funnel(
    core: &CoreState,
    operator: &OperatorContext,
    inputs: FunnelInputs,
) -> Result<FunnelView, CoreError> {
    inputs.validate()?;
    let _guard = core.begin_save(operator)?;

    let conn = core.open_db()?;
    let meta = db::upsert_funnel(&conn, operator.id(), &inputs).map_err(|e| {
        tracing::warn!(operator_id = operator.id(), error = %e, "Funnel save failed");
        e
    })?;

    tracing::info!(
        operator_id = operator.id(),
        revision = meta.revision,
        "Funnel saved"
    );
    Ok(FunnelView::new(inputs, Some(meta)))
}
