//! Day-plan parser for free-text oracle replies.
//!
//! Each line is offered to an ordered list of label matchers; the first one
//! that recognizes `<label><:|：><rest>` wins. The remainder is split into
//! activities on the first delimiter present (`、`, then `,`, then `;`).
//! Nothing here fails: unrecognized lines are skipped.

use std::sync::LazyLock;

use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, info};

/// Activities grouped by day label, in the order labels first appeared.
///
/// A repeated label replaces the earlier activities but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyPlan {
    days: Vec<(String, Vec<String>)>,
}

impl DailyPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the activities of `label`.
    pub fn insert(&mut self, label: impl Into<String>, activities: Vec<String>) {
        let label = label.into();
        match self.days.iter_mut().find(|(l, _)| *l == label) {
            Some((_, existing)) => *existing = activities,
            None => self.days.push((label, activities)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&[String]> {
        self.days
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, acts)| acts.as_slice())
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.days.iter().map(|(l, _)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.days.iter().map(|(l, acts)| (l.as_str(), acts.as_slice()))
    }
}

impl Serialize for DailyPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for (label, activities) in &self.days {
            map.serialize_entry(label, activities)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Label matchers
// ---------------------------------------------------------------------------

/// A pure function recognizing one family of day labels.
type LabelMatcher = fn(&str) -> Option<(String, String)>;

/// Build a case-insensitive `^(<label>)[:：]\s*(.+)` regex.
fn label_regex(label: &str) -> Regex {
    Regex::new(&format!(r"(?i)^({label})[:：]\s*(.+)")).expect("label regex is valid")
}

fn capture(re: &Regex, line: &str) -> Option<(String, String)> {
    let caps = re.captures(line)?;
    Some((caps[1].to_owned(), caps[2].to_owned()))
}

static LOCALIZED_WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    label_regex(
        r"週[一二三四五六日]|Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday|Day \d+",
    )
});
static LOCALIZED_MONTH_DAY: LazyLock<Regex> =
    LazyLock::new(|| label_regex(r"\d{1,2}月\d{1,2}日"));
static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| label_regex(r"\d{4}-\d{2}-\d{2}"));
static SHORT_WEEKDAY: LazyLock<Regex> =
    LazyLock::new(|| label_regex(r"Mon|Tue|Wed|Thu|Fri|Sat|Sun"));
static FULL_WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    label_regex(r"Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday")
});

fn match_localized_weekday(line: &str) -> Option<(String, String)> {
    capture(&LOCALIZED_WEEKDAY, line)
}

fn match_localized_month_day(line: &str) -> Option<(String, String)> {
    capture(&LOCALIZED_MONTH_DAY, line)
}

fn match_iso_date(line: &str) -> Option<(String, String)> {
    capture(&ISO_DATE, line)
}

fn match_short_weekday(line: &str) -> Option<(String, String)> {
    capture(&SHORT_WEEKDAY, line)
}

fn match_full_weekday(line: &str) -> Option<(String, String)> {
    capture(&FULL_WEEKDAY, line)
}

/// Matchers in priority order.
const MATCHERS: [LabelMatcher; 5] = [
    match_localized_weekday,
    match_localized_month_day,
    match_iso_date,
    match_short_weekday,
    match_full_weekday,
];

/// Split a line into `(label, rest)` using the first matcher that fires.
pub fn match_day_line(line: &str) -> Option<(String, String)> {
    MATCHERS.iter().find_map(|matcher| matcher(line))
}

// ---------------------------------------------------------------------------
// Activity splitting
// ---------------------------------------------------------------------------

const DELIMITERS: [char; 3] = ['、', ',', ';'];

static BULLET_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[•\-*]\s*").expect("bullet regex is valid"));

/// Split the text after a label into cleaned activities.
pub fn split_activities(text: &str) -> Vec<String> {
    let fragments: Vec<&str> = match DELIMITERS.iter().find(|d| text.contains(**d)) {
        Some(delim) => text.split(*delim).collect(),
        None => vec![text],
    };

    fragments
        .into_iter()
        .map(str::trim)
        .filter(|frag| !matches!(*frag, "" | "•" | "-" | "*"))
        .map(|frag| BULLET_PREFIX.replace(frag, "").trim().to_owned())
        .filter(|act| !act.is_empty())
        .collect()
}

/// Parse an oracle reply into a [`DailyPlan`].
///
/// Returns an empty plan when no line carries a recognizable day label;
/// the caller decides whether to fall back.
pub fn parse_plan(reply: &str) -> DailyPlan {
    let preview: String = reply.chars().take(200).collect();
    debug!(preview = %preview, "parsing oracle plan reply");

    let mut plan = DailyPlan::new();
    for line in reply.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some((label, rest)) = match_day_line(line) else {
            continue;
        };
        let activities = split_activities(&rest);
        if activities.is_empty() {
            continue;
        }
        debug!(label = %label, ?activities, "parsed day");
        plan.insert(label, activities);
    }

    info!(days = plan.len(), "parsed plan reply");
    plan
}
