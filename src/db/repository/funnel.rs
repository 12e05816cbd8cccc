//! Funnel snapshot persistence: one row per operator, upsert on save.
//!
//! Last write wins. `revision` counts saves for display and diagnostics;
//! it is not checked on write.

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::db::DatabaseError;
use crate::funnel::{DealEntry, DealList, DealValueSource, FunnelInputs, LocationTier};

/// Row metadata for a stored snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub revision: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Raw column values, converted outside the rusqlite row closure so JSON
/// and enum errors surface as `DatabaseError`.
struct SnapshotRow {
    hours_per_month: f64,
    hours_per_treatment: f64,
    deal_value_source: String,
    manual_value: f64,
    deals: String,
    location_tier: Option<String>,
    city: Option<String>,
    specialty: Option<String>,
    meta: SnapshotMeta,
}

/// Load the operator's snapshot. `None` if they never saved.
pub fn load_funnel(
    conn: &Connection,
    operator_id: &str,
) -> Result<Option<(FunnelInputs, SnapshotMeta)>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT hours_per_month, hours_per_treatment, deal_value_source, manual_value,
                    deals, location_tier, city, specialty, revision, created_at, updated_at
             FROM funnel_snapshots WHERE operator_id = ?1",
            [operator_id],
            |row| {
                Ok(SnapshotRow {
                    hours_per_month: row.get(0)?,
                    hours_per_treatment: row.get(1)?,
                    deal_value_source: row.get(2)?,
                    manual_value: row.get(3)?,
                    deals: row.get(4)?,
                    location_tier: row.get(5)?,
                    city: row.get(6)?,
                    specialty: row.get(7)?,
                    meta: SnapshotMeta {
                        revision: row.get(8)?,
                        created_at: row.get(9)?,
                        updated_at: row.get(10)?,
                    },
                })
            },
        )
        .optional()?;

    let Some(row) = row else {
        return Ok(None);
    };

    let deals: Vec<DealEntry> = serde_json::from_str(&row.deals)?;
    // An unrecognised tier reads as "no location chosen", which only changes
    // the rate to the default one.
    let location_tier = row
        .location_tier
        .as_deref()
        .and_then(|tag| tag.parse::<LocationTier>().ok());

    let inputs = FunnelInputs {
        hours_available_per_month: row.hours_per_month,
        hours_per_treatment: row.hours_per_treatment,
        deal_value_source: row.deal_value_source.parse::<DealValueSource>()?,
        manual_value: row.manual_value,
        deals: DealList::from(deals),
        location_tier,
        city: row.city,
        specialty: row.specialty,
    };
    Ok(Some((inputs, row.meta)))
}

/// Create the operator's snapshot on first save, overwrite it afterwards.
pub fn upsert_funnel(
    conn: &Connection,
    operator_id: &str,
    inputs: &FunnelInputs,
) -> Result<SnapshotMeta, DatabaseError> {
    let deals = serde_json::to_string(inputs.deals.entries())?;
    conn.execute(
        "INSERT INTO funnel_snapshots (operator_id, hours_per_month, hours_per_treatment,
             deal_value_source, manual_value, deals, location_tier, city, specialty)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(operator_id) DO UPDATE SET
             hours_per_month = excluded.hours_per_month,
             hours_per_treatment = excluded.hours_per_treatment,
             deal_value_source = excluded.deal_value_source,
             manual_value = excluded.manual_value,
             deals = excluded.deals,
             location_tier = excluded.location_tier,
             city = excluded.city,
             specialty = excluded.specialty,
             revision = funnel_snapshots.revision + 1,
             updated_at = datetime('now')",
        params![
            operator_id,
            inputs.hours_available_per_month,
            inputs.hours_per_treatment,
            inputs.deal_value_source.as_str(),
            inputs.manual_value,
            deals,
            inputs.location_tier.map(|tier| tier.as_str()),
            inputs.city,
            inputs.specialty,
        ],
    )?;

    let meta = conn.query_row(
        "SELECT revision, created_at, updated_at FROM funnel_snapshots WHERE operator_id = ?1",
        [operator_id],
        |row| {
            Ok(SnapshotMeta {
                revision: row.get(0)?,
                created_at: row.get(1)?,
                updated_at: row.get(2)?,
            })
        },
    )?;
    tracing::debug!(operator_id, revision = meta.revision, "Funnel snapshot upserted");
    Ok(meta)
}

/// Remove the operator's snapshot. Returns whether a row existed.
pub fn delete_funnel(conn: &Connection, operator_id: &str) -> Result<bool, DatabaseError> {
    let removed = conn.execute(
        "DELETE FROM funnel_snapshots WHERE operator_id = ?1",
        [operator_id],
    )?;
    Ok(removed > 0)
}

/// Number of stored snapshots (all operators).
pub fn count_funnels(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM funnel_snapshots", [], |row| row.get(0))?;
    Ok(count)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
