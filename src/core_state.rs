//! Transport-agnostic application state.
//!
//! `CoreState` is shared (behind `Arc`) by every API handler. It owns the
//! database location and the per-operator save guard; it holds no operator
//! data itself. Operator identity travels explicitly as [`OperatorContext`].

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::config;
use crate::db::{self, DatabaseError};
use crate::funnel::FunnelError;

/// Maximum accepted operator id length.
pub const MAX_OPERATOR_ID_LEN: usize = 128;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Lock poisoned")]
    LockPoisoned,
    #[error("A save is already in progress for this operator")]
    SaveInProgress,
    #[error("Invalid operator id: {0}")]
    InvalidOperator(String),
    #[error("Invalid funnel input: {0}")]
    InvalidInput(#[from] FunnelError),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Cannot prepare data directory: {0}")]
    Io(#[from] std::io::Error),
}

// ═══════════════════════════════════════════════════════════
// Operator identity
// ═══════════════════════════════════════════════════════════

/// Identity of the operator a request acts for.
///
/// Authentication happens upstream; this type only guarantees the id is
/// usable as a storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperatorContext {
    operator_id: String,
}

impl OperatorContext {
    pub fn new(operator_id: &str) -> Result<Self, CoreError> {
        let trimmed = operator_id.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidOperator("operator id is blank".into()));
        }
        if trimmed.len() > MAX_OPERATOR_ID_LEN {
            return Err(CoreError::InvalidOperator(format!(
                "operator id exceeds {MAX_OPERATOR_ID_LEN} characters"
            )));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(CoreError::InvalidOperator(
                "operator id contains control characters".into(),
            ));
        }
        Ok(Self {
            operator_id: trimmed.to_string(),
        })
    }

    pub fn id(&self) -> &str {
        &self.operator_id
    }
}

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    /// SQLite file holding the funnel snapshots.
    pub db_path: PathBuf,
    /// Operators with a save currently running.
    saves_in_flight: Mutex<HashSet<String>>,
}

impl Default for CoreState {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreState {
    /// State backed by the configured database path.
    pub fn new() -> Self {
        Self::with_db_path(config::database_path())
    }

    pub fn with_db_path(db_path: PathBuf) -> Self {
        Self {
            db_path,
            saves_in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Open a connection to the funnel database, creating its directory
    /// and schema on first use.
    pub fn open_db(&self) -> Result<rusqlite::Connection, CoreError> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(db::open_database(&self.db_path)?)
    }

    /// Mark a save as running for this operator.
    ///
    /// Fails with `SaveInProgress` while another save holds the guard.
    /// The mark is cleared when the returned guard drops.
    pub fn begin_save(&self, operator: &OperatorContext) -> Result<SaveGuard<'_>, CoreError> {
        let mut in_flight = self
            .saves_in_flight
            .lock()
            .map_err(|_| CoreError::LockPoisoned)?;
        if !in_flight.insert(operator.id().to_string()) {
            tracing::warn!(operator_id = operator.id(), "Re-entrant funnel save rejected");
            return Err(CoreError::SaveInProgress);
        }
        Ok(SaveGuard {
            state: self,
            operator_id: operator.id().to_string(),
        })
    }

    pub fn is_saving(&self, operator: &OperatorContext) -> bool {
        self.saves_in_flight
            .lock()
            .map(|set| set.contains(operator.id()))
            .unwrap_or(false)
    }
}

/// Clears the operator's in-flight mark on drop.
pub struct SaveGuard<'a> {
    state: &'a CoreState,
    operator_id: String,
}

impl Drop for SaveGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut in_flight) = self.state.saves_in_flight.lock() {
            in_flight.remove(&self.operator_id);
        }
    }
}
