use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

/// Persisted notes: date key -> ordered free-text activities.
pub type NoteMap = BTreeMap<String, Vec<String>>;

/// Outcome of a bulk note deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeletionReport {
    /// Dates whose notes were removed, in ascending order.
    pub deleted_dates: Vec<String>,
    /// Total number of notes removed across those dates.
    pub deleted_notes_count: usize,
}

impl DeletionReport {
    pub fn is_empty(&self) -> bool {
        self.deleted_dates.is_empty()
    }

    /// Remove `date` from `notes`, recording it when present.
    pub(crate) fn take(&mut self, notes: &mut NoteMap, date: &str) {
        if let Some(removed) = notes.remove(date) {
            self.deleted_notes_count += removed.len();
            self.deleted_dates.push(date.to_owned());
        }
    }
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Persisted labels: date key -> label.
pub type LabelMap = BTreeMap<String, DateLabel>;

/// Color applied when a label is saved without one.
pub const DEFAULT_LABEL_COLOR: &str = "#ff6b6b";

/// Label text written by "mark as important".
pub const IMPORTANT_LABEL: &str = "Important Deadline";

/// Color written by "mark as important".
pub const IMPORTANT_LABEL_COLOR: &str = "#dc3545";

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("color regex is valid"));

/// A colored label attached to one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateLabel {
    pub label: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

impl DateLabel {
    /// Whether the label text marks the date as important.
    pub fn is_important(&self) -> bool {
        let text = self.label.to_lowercase();
        text.contains("important") || text.contains("deadline")
    }
}

/// Validate a `#rrggbb` color string.
pub fn validate_color(color: &str) -> Result<(), StoreError> {
    if HEX_COLOR.is_match(color) {
        Ok(())
    } else {
        Err(StoreError::invalid(
            "Invalid color format. Use hex format (e.g., #ff6b6b)",
        ))
    }
}
