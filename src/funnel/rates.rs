//! Conversion-rate tables for the i95D funnel.
//!
//! Two static lookups feed the calculator:
//! - evaluation → closing, keyed by the average deal value
//! - contact → evaluation, keyed by the location tier
//!
//! Rates are stored as whole percents so the tables and the simulator's
//! percent sliders compare exactly.

use serde::{Deserialize, Serialize};

use crate::db::DatabaseError;

/// Deal values below this close at the highest rate.
pub const LOW_TICKET_CEILING: f64 = 1_000.0;

/// Deal values at or above this close at the lowest rate.
pub const HIGH_TICKET_FLOOR: f64 = 5_000.0;

/// Rate used when the operator has not picked a location.
pub const DEFAULT_LEAD_TO_EVALUATION: ConversionRate = ConversionRate::from_percent(30);

/// A conversion rate in whole percent (never zero in the lookup tables).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversionRate(u32);

impl ConversionRate {
    pub const fn from_percent(percent: u32) -> Self {
        Self(percent)
    }

    pub fn percent(self) -> u32 {
        self.0
    }

    pub fn as_fraction(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

// ═══════════════════════════════════════════
// Location tier
// ═══════════════════════════════════════════

/// Population-based classification of the practice's city.
///
/// "Unset" is modelled as `Option::None` at the call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationTier {
    Small,
    Medium,
    Large,
    Capital,
}

impl LocationTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Capital => "capital",
        }
    }
}

impl std::fmt::Display for LocationTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LocationTier {
    type Err = DatabaseError;

    /// Accepts the English tags and the Portuguese ones found in older rows.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" | "pequena" => Ok(Self::Small),
            "medium" | "media" => Ok(Self::Medium),
            "large" | "grande" => Ok(Self::Large),
            "capital" => Ok(Self::Capital),
            _ => Err(DatabaseError::InvalidEnum {
                field: "LocationTier".into(),
                value: s.into(),
            }),
        }
    }
}

// ═══════════════════════════════════════════
// Lookups
// ═══════════════════════════════════════════

/// Evaluation → closing rate for an average deal value.
///
/// Boundaries belong to the upper tier: 1000 closes at 40%, 5000 at 30%.
/// Anything below 1000 (including negative or NaN input) closes at 50%.
pub fn evaluation_to_closing_rate(average_deal_value: f64) -> ConversionRate {
    if average_deal_value >= HIGH_TICKET_FLOOR {
        ConversionRate::from_percent(30)
    } else if average_deal_value >= LOW_TICKET_CEILING {
        ConversionRate::from_percent(40)
    } else {
        ConversionRate::from_percent(50)
    }
}

/// Contact → evaluation rate for a location tier.
pub fn lead_to_evaluation_rate(tier: Option<LocationTier>) -> ConversionRate {
    match tier {
        Some(LocationTier::Small) => ConversionRate::from_percent(50),
        Some(LocationTier::Medium) => ConversionRate::from_percent(40),
        Some(LocationTier::Large) | Some(LocationTier::Capital) => {
            ConversionRate::from_percent(30)
        }
        None => DEFAULT_LEAD_TO_EVALUATION,
    }
}
