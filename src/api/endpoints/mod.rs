//! API endpoint handlers.
//!
//! Handlers are thin: they validate the request and delegate to the
//! service functions in `crate::snapshot` and the `crate::funnel` lookups.

pub mod catalog;
pub mod funnel;
pub mod health;
