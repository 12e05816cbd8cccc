//! Funnel API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.
//!
//! Middleware stack on operator routes (outermost → innermost):
//! 1. Operator identity → 2. Audit logger

use std::sync::Arc;

use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the funnel API router.
///
/// Endpoint handlers use `State<ApiContext>` (provided via `with_state`);
/// operator identity reaches them as `Extension<OperatorContext>`.
pub fn funnel_api_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core))
}

fn build_router(ctx: ApiContext) -> Router {
    // Layers are applied from bottom (innermost) to top (outermost):
    //   Operator → Audit → Handler
    // route_layer keeps unmatched paths out of the operator check.
    let protected = Router::new()
        .route(
            "/funnel",
            get(endpoints::funnel::get_funnel).put(endpoints::funnel::save_funnel),
        )
        .route("/funnel/calculate", post(endpoints::funnel::calculate))
        .route("/funnel/simulate", post(endpoints::funnel::simulate))
        .with_state(ctx)
        .route_layer(from_fn(middleware::audit::log_access))
        .route_layer(from_fn(middleware::operator::require_operator));

    // Unprotected routes: liveness and the static catalogues
    let public = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/locations", get(endpoints::catalog::search_locations))
        .route(
            "/locations/classify",
            get(endpoints::catalog::classify_location),
        )
        .route("/specialties", get(endpoints::catalog::list_specialties));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", protected.merge(public))
        .layer(cors)
}
