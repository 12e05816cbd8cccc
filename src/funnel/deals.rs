//! Deal list: realized treatment values used to compute the average ticket (i4).

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// One realized treatment value.
///
/// Entries arriving without an id (or with a blank one) get a fresh uuid
/// when the list is deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealEntry {
    #[serde(default)]
    pub id: String,
    pub label: String,
    pub value: f64,
}

/// Ordered list of deal entries.
///
/// Invalid input never errors: `append` simply ignores it, and `remove`
/// is idempotent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DealList {
    entries: Vec<DealEntry>,
}

impl DealList {
    pub fn new() -> Self {
        Self::default()
    }

    /// The four entries a new calculator starts with.
    pub fn seeded() -> Self {
        let mut list = Self::new();
        for (label, value) in [
            ("Fernanda", 12_800.0),
            ("Joao", 9_500.0),
            ("Marcela", 16_900.0),
            ("Daniel", 8_900.0),
        ] {
            list.append(label, value);
        }
        list
    }

    /// Append an entry. Returns `None` (and leaves the list unchanged) when
    /// the label is blank or the value is negative or not finite.
    pub fn append(&mut self, label: &str, value: f64) -> Option<&DealEntry> {
        let label = label.trim();
        if label.is_empty() || !value.is_finite() || value < 0.0 {
            return None;
        }
        self.entries.push(DealEntry {
            id: Uuid::new_v4().to_string(),
            label: label.to_string(),
            value,
        });
        self.entries.last()
    }

    /// Append from raw form text. Blank or non-numeric value text is a no-op.
    pub fn append_text(&mut self, label: &str, value_text: &str) -> Option<&DealEntry> {
        let value = value_text.trim().parse::<f64>().ok()?;
        self.append(label, value)
    }

    /// Remove by id. Returns whether an entry was actually removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Arithmetic mean of the values, 0 for an empty list.
    pub fn mean(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let total: f64 = self.entries.iter().map(|entry| entry.value).sum();
        total / self.entries.len() as f64
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DealEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[DealEntry] {
        &self.entries
    }
}

impl From<Vec<DealEntry>> for DealList {
    fn from(mut entries: Vec<DealEntry>) -> Self {
        for entry in entries.iter_mut().filter(|e| e.id.trim().is_empty()) {
            entry.id = Uuid::new_v4().to_string();
        }
        Self { entries }
    }
}

impl<'de> Deserialize<'de> for DealList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<DealEntry>::deserialize(deserializer).map(Self::from)
    }
}
