//! Operator identity middleware.
//!
//! Authentication happens at the gateway in front of this service; it
//! forwards the authenticated operator as `X-Operator-Id`. This layer turns
//! the header into an [`OperatorContext`] extension for downstream handlers.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::OPERATOR_HEADER;
use crate::core_state::OperatorContext;

/// Require a usable operator id on every protected route.
pub async fn require_operator(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_operator_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_operator_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let raw = req
        .headers()
        .get(OPERATOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::OperatorRequired)?;

    let operator = OperatorContext::new(raw).map_err(|e| {
        tracing::debug!(error = %e, "Rejected operator header");
        ApiError::OperatorRequired
    })?;

    req.extensions_mut().insert(operator);
    Ok(next.run(req).await)
}
