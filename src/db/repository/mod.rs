//! Repository layer — entity-scoped database operations.

mod funnel;

pub use funnel::*;
