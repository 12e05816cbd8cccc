//! i95D funnel calculator: capacity (i5) → closings (i3) → evaluations (i2)
//! → contacts (i1), plus average ticket (i4) and monthly revenue.
//!
//! Everything here is a pure function of [`FunnelInputs`]. Nothing is cached;
//! callers re-derive on every input change.

use serde::{Deserialize, Serialize};

use super::deals::DealList;
use super::rates::{self, ConversionRate, LocationTier};
use super::specialty;
use super::FunnelError;

pub const DEFAULT_HOURS_PER_MONTH: f64 = 160.0;
pub const DEFAULT_HOURS_PER_TREATMENT: f64 = 8.0;
pub const DEFAULT_MANUAL_VALUE: f64 = 12_025.0;

/// Where the average deal value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealValueSource {
    ListAverage,
    ManualValue,
}

impl DealValueSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListAverage => "list_average",
            Self::ManualValue => "manual_value",
        }
    }
}

impl std::str::FromStr for DealValueSource {
    type Err = crate::db::DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list_average" => Ok(Self::ListAverage),
            "manual_value" => Ok(Self::ManualValue),
            _ => Err(crate::db::DatabaseError::InvalidEnum {
                field: "DealValueSource".into(),
                value: s.into(),
            }),
        }
    }
}

/// Operator inputs for one funnel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunnelInputs {
    pub hours_available_per_month: f64,
    pub hours_per_treatment: f64,
    pub deal_value_source: DealValueSource,
    pub manual_value: f64,
    pub deals: DealList,
    pub location_tier: Option<LocationTier>,
    /// Display label of the chosen city, if any.
    pub city: Option<String>,
    /// Id of the specialty preset last applied, if any. Must name a
    /// catalogue entry; hours may still be edited after applying it.
    pub specialty: Option<String>,
}

impl Default for FunnelInputs {
    fn default() -> Self {
        Self {
            hours_available_per_month: DEFAULT_HOURS_PER_MONTH,
            hours_per_treatment: DEFAULT_HOURS_PER_TREATMENT,
            deal_value_source: DealValueSource::ListAverage,
            manual_value: DEFAULT_MANUAL_VALUE,
            deals: DealList::seeded(),
            location_tier: None,
            city: None,
            specialty: None,
        }
    }
}

/// The derived indicators. Never stored; always recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedFunnel {
    /// i5: treatments the practice can finish per month.
    pub capacity: u64,
    /// i3: always equal to `capacity`.
    pub closings: u64,
    /// i2
    pub evaluations: u64,
    /// i1
    pub contacts: u64,
    /// i4
    pub average_deal_value: f64,
    pub monthly_revenue: f64,
    pub evaluation_to_closing_rate: ConversionRate,
    pub lead_to_evaluation_rate: ConversionRate,
}

impl FunnelInputs {
    /// Average ticket: list mean in list mode, otherwise the manual figure.
    pub fn average_deal_value(&self) -> f64 {
        match self.deal_value_source {
            DealValueSource::ListAverage => self.deals.mean(),
            DealValueSource::ManualValue => self.manual_value,
        }
    }

    /// Derive the full funnel.
    pub fn derive(&self) -> DerivedFunnel {
        let capacity = capacity(self.hours_available_per_month, self.hours_per_treatment);
        let closings = capacity;
        let average_deal_value = self.average_deal_value();

        let evaluation_to_closing_rate = rates::evaluation_to_closing_rate(average_deal_value);
        let evaluations =
            ceil_div_percent(closings, f64::from(evaluation_to_closing_rate.percent()));

        let lead_to_evaluation_rate = rates::lead_to_evaluation_rate(self.location_tier);
        let contacts =
            ceil_div_percent(evaluations, f64::from(lead_to_evaluation_rate.percent()));

        let monthly_revenue = closings as f64 * average_deal_value;

        tracing::trace!(capacity, evaluations, contacts, monthly_revenue, "funnel derived");

        DerivedFunnel {
            capacity,
            closings,
            evaluations,
            contacts,
            average_deal_value,
            monthly_revenue,
            evaluation_to_closing_rate,
            lead_to_evaluation_rate,
        }
    }

    /// Set hours per treatment from a specialty preset.
    ///
    /// Unknown ids leave the inputs untouched and return `false`.
    pub fn apply_specialty(&mut self, id: &str) -> bool {
        match specialty::specialty(id) {
            Some(preset) => {
                self.hours_per_treatment = preset.avg_hours;
                self.specialty = Some(preset.id.to_string());
                true
            }
            None => false,
        }
    }

    /// Boundary validation for inputs arriving from outside (API bodies,
    /// stored rows). The calculator itself is total and never calls this.
    pub fn validate(&self) -> Result<(), FunnelError> {
        check_bounded("hours_available_per_month", self.hours_available_per_month, MAX_HOURS)?;
        check_bounded("hours_per_treatment", self.hours_per_treatment, MAX_HOURS)?;
        check_bounded("manual_value", self.manual_value, MAX_DEAL_VALUE)?;
        for entry in self.deals.iter() {
            if entry.label.trim().is_empty() {
                return Err(FunnelError::BlankDealLabel);
            }
            check_bounded("deal value", entry.value, MAX_DEAL_VALUE)?;
        }
        if let Some(ref id) = self.specialty {
            if specialty::specialty(id).is_none() {
                return Err(FunnelError::UnknownSpecialty(id.clone()));
            }
        }
        if let Some(ref city) = self.city {
            if city.len() > MAX_CITY_LEN {
                return Err(FunnelError::TooLong { field: "city", max: MAX_CITY_LEN });
            }
        }
        Ok(())
    }
}

const MAX_CITY_LEN: usize = 120;

/// Upper bound for either hours figure.
pub const MAX_HOURS: f64 = 100_000.0;
/// Upper bound for a single ticket, manual or listed.
pub const MAX_DEAL_VALUE: f64 = 1_000_000_000.0;

fn check_bounded(field: &'static str, value: f64, max: f64) -> Result<(), FunnelError> {
    if !value.is_finite() || value < 0.0 {
        return Err(FunnelError::InvalidNumber { field, value });
    }
    if value > max {
        return Err(FunnelError::OutOfRange { field, max });
    }
    Ok(())
}

/// floor(hours / hours_per_treatment), 0 when the divisor is 0.
///
/// Also 0 for a NaN or non-positive quotient. Quotients beyond `u64::MAX`
/// saturate.
pub fn capacity(hours_available_per_month: f64, hours_per_treatment: f64) -> u64 {
    if hours_per_treatment == 0.0 {
        return 0;
    }
    let quotient = (hours_available_per_month / hours_per_treatment).floor();
    if quotient.is_nan() || quotient <= 0.0 {
        return 0;
    }
    quotient as u64
}

/// ceil(count / (percent / 100)), 0 for a non-positive rate.
///
/// The count is scaled instead of the rate so whole-percent quotients stay exact.
pub(crate) fn ceil_div_percent(count: u64, percent: f64) -> u64 {
    if percent.is_nan() || percent <= 0.0 {
        return 0;
    }
    // `as` saturates at u64::MAX
    (count as f64 * 100.0 / percent).ceil() as u64
}
