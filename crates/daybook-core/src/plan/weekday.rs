//! Day-label to date resolution.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

/// Localized weekday labels, Monday first. The plan prompt asks for these.
pub const LOCALIZED_WEEKDAYS: [&str; 7] = ["週一", "週二", "週三", "週四", "週五", "週六", "週日"];

/// Normalized day token -> offset into the planning window.
static DAY_OFFSETS: LazyLock<HashMap<&'static str, usize>> = LazyLock::new(|| {
    const NAMES: [[&str; 3]; 7] = [
        ["monday", "mon", "週一"],
        ["tuesday", "tue", "週二"],
        ["wednesday", "wed", "週三"],
        ["thursday", "thu", "週四"],
        ["friday", "fri", "週五"],
        ["saturday", "sat", "週六"],
        ["sunday", "sun", "週日"],
    ];
    NAMES
        .iter()
        .enumerate()
        .flat_map(|(offset, names)| names.iter().map(move |name| (*name, offset)))
        .collect()
});

static DAY_ORDINAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^day\s*(\d+)").expect("ordinal regex is valid"));

/// Offset into the window named by `label`, before range checking.
fn label_offset(label: &str) -> Option<usize> {
    let normalized = label.trim().to_lowercase();
    if let Some(offset) = DAY_OFFSETS.get(normalized.as_str()) {
        return Some(*offset);
    }
    let caps = DAY_ORDINAL.captures(&normalized)?;
    let n: usize = caps[1].parse().ok()?;
    n.checked_sub(1)
}

/// Resolve a day label against the window dates.
///
/// Weekday names ("Monday", "mon", "週一") name fixed offsets 0..=6 into the
/// window; "Day N" names offset `N - 1`. Unknown labels and offsets past
/// the end of `week_dates` are unmappable and logged.
pub fn map_day_label<'a>(label: &str, week_dates: &'a [String]) -> Option<&'a str> {
    let resolved = label_offset(label)
        .and_then(|offset| week_dates.get(offset))
        .map(String::as_str);
    if resolved.is_none() {
        warn!(label = %label, "could not map day label to a date");
    }
    resolved
}
