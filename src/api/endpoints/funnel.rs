//! Funnel endpoints: load, save, recalculate and simulate.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::core_state::OperatorContext;
use crate::funnel::{FunnelInputs, SimulationOverrides};
use crate::snapshot::{self, FunnelView, SimulationView};

#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    #[serde(default)]
    pub inputs: FunnelInputs,
    #[serde(default)]
    pub overrides: Option<SimulationOverrides>,
}

/// `GET /api/funnel` — stored funnel, or defaults before the first save.
pub async fn get_funnel(
    State(ctx): State<ApiContext>,
    Extension(operator): Extension<OperatorContext>,
) -> Result<Json<FunnelView>, ApiError> {
    let view = snapshot::open_funnel(&ctx.core, &operator)?;
    Ok(Json(view))
}

/// `PUT /api/funnel` — explicit save.
pub async fn save_funnel(
    State(ctx): State<ApiContext>,
    Extension(operator): Extension<OperatorContext>,
    body: Result<Json<FunnelInputs>, JsonRejection>,
) -> Result<Json<FunnelView>, ApiError> {
    let Json(inputs) = body?;
    let view = snapshot::save_funnel(&ctx.core, &operator, inputs)?;
    Ok(Json(view))
}

/// `POST /api/funnel/calculate` — derive without persisting.
pub async fn calculate(
    Extension(_operator): Extension<OperatorContext>,
    body: Result<Json<FunnelInputs>, JsonRejection>,
) -> Result<Json<FunnelView>, ApiError> {
    let Json(inputs) = body?;
    inputs
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok(Json(FunnelView::new(inputs, None)))
}

/// `POST /api/funnel/simulate` — what-if against the given inputs.
pub async fn simulate(
    Extension(_operator): Extension<OperatorContext>,
    body: Result<Json<SimulateRequest>, JsonRejection>,
) -> Result<Json<SimulationView>, ApiError> {
    let Json(req) = body?;
    req.inputs
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    if let Some(overrides) = &req.overrides {
        validate_overrides(overrides)?;
    }
    Ok(Json(snapshot::simulate_inputs(&req.inputs, req.overrides)))
}

fn validate_overrides(overrides: &SimulationOverrides) -> Result<(), ApiError> {
    let fields = [
        (
            "lead_to_evaluation_rate_percent",
            overrides.lead_to_evaluation_rate_percent,
        ),
        (
            "evaluation_to_closing_rate_percent",
            overrides.evaluation_to_closing_rate_percent,
        ),
        ("simulated_deal_value", overrides.simulated_deal_value),
    ];
    for (field, value) in fields {
        if !value.is_finite() || value < 0.0 {
            return Err(ApiError::BadRequest(format!(
                "{field} must be a finite, nonnegative number"
            )));
        }
    }
    Ok(())
}
