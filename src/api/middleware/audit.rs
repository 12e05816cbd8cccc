//! Access logging middleware.
//!
//! Logs every protected request with operator id, method, path, status and
//! latency. Runs innermost (after the operator layer has injected identity).

use std::time::Instant;

use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::core_state::OperatorContext;

pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let operator_id = req
        .extensions()
        .get::<OperatorContext>()
        .map(|op| op.id().to_string())
        .unwrap_or_default();

    let started = Instant::now();
    let response = next.run(req).await;

    tracing::info!(
        operator_id = %operator_id,
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "API access"
    );

    response
}
