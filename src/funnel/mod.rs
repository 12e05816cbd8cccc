//! i95D sales funnel: the commercial-dimension indicators i1–i5.
//!
//! `calculator` derives the chain from operator inputs, `simulation` replays
//! it under what-if overrides, and the remaining modules are the static
//! lookups and display helpers the calculator and the API consume.

pub mod calculator;
pub mod deals;
pub mod format;
pub mod location;
pub mod rates;
pub mod simulation;
pub mod specialty;

pub use calculator::{DealValueSource, DerivedFunnel, FunnelInputs};
pub use deals::{DealEntry, DealList};
pub use rates::{ConversionRate, LocationTier};
pub use simulation::{simulate, SimulatedFunnel, SimulationOverrides};

use thiserror::Error;

/// Rejected operator input at the service boundary.
#[derive(Error, Debug, PartialEq)]
pub enum FunnelError {
    #[error("{field} must be a finite, nonnegative number (got {value})")]
    InvalidNumber { field: &'static str, value: f64 },

    #[error("{field} must not exceed {max}")]
    OutOfRange { field: &'static str, max: f64 },

    #[error("Unknown specialty: {0}")]
    UnknownSpecialty(String),

    #[error("Deal entries need a non-blank label")]
    BlankDealLabel,

    #[error("{field} must be {max} characters or fewer")]
    TooLong { field: &'static str, max: usize },
}
