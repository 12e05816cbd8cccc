//! Shared types for the API layer.

use std::sync::Arc;

use crate::core_state::CoreState;

/// Header carrying the operator identity, set by the upstream auth gateway.
pub const OPERATOR_HEADER: &str = "X-Operator-Id";

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}
