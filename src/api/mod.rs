//! HTTP API for the funnel dashboard.
//!
//! Routes are nested under `/api/`. Operator-scoped routes sit behind a
//! middleware stack: Operator identity → Audit → Handler. The router is
//! composable — `funnel_api_router()` returns a `Router` that can be mounted
//! on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::funnel_api_router;
pub use server::{ApiServer, ApiSession};
pub use types::ApiContext;
