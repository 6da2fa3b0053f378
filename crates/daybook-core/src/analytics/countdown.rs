//! Countdowns to upcoming deadlines.

use chrono::NaiveDate;
use serde::Serialize;

use daybook_store::calendar::parse_date_key;
use daybook_store::{LabelMap, NoteMap};

use crate::categorize::presets::{contains_any, library};

/// Urgency band of a countdown, most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    Urgent,
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn from_days_remaining(days: i64) -> Self {
        match days {
            ..=1 => Self::Critical,
            2..=3 => Self::Urgent,
            4..=7 => Self::High,
            8..=14 => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Critical => "#dc3545",
            Self::Urgent => "#fd7e14",
            Self::High => "#ffc107",
            Self::Medium => "#17a2b8",
            Self::Low => "#6c757d",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Countdown {
    pub date: String,
    pub activity: String,
    pub days_remaining: i64,
    pub priority: Priority,
    pub priority_color: &'static str,
    /// The date's label when it marks the date important, else empty.
    pub label: String,
    pub label_color: String,
    pub is_labeled: bool,
    pub is_keyword_match: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CountdownStats {
    pub total: usize,
    pub critical: usize,
    pub urgent: usize,
    pub high: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountdownReport {
    pub countdowns: Vec<Countdown>,
    pub statistics: CountdownStats,
}

/// Every important activity dated `today` or later.
///
/// An activity counts when its text contains a deadline keyword or its
/// date carries a label with an importance keyword. Sorted by priority,
/// then by days remaining.
pub fn countdowns(notes: &NoteMap, labels: &LabelMap, today: NaiveDate) -> CountdownReport {
    let keywords = &library().countdown;
    let mut countdowns = Vec::new();

    for (date, activities) in notes {
        let Ok(event_date) = parse_date_key(date) else {
            continue;
        };
        let days_remaining = (event_date - today).num_days();
        if days_remaining < 0 {
            continue;
        }

        let important_label = labels
            .get(date)
            .filter(|label| contains_any(&label.label.to_lowercase(), &keywords.label_keywords));
        let priority = Priority::from_days_remaining(days_remaining);

        for activity in activities {
            let is_keyword_match =
                contains_any(&activity.to_lowercase(), &keywords.activity_keywords);
            if !is_keyword_match && important_label.is_none() {
                continue;
            }
            countdowns.push(Countdown {
                date: date.clone(),
                activity: activity.clone(),
                days_remaining,
                priority,
                priority_color: priority.color(),
                label: important_label.map(|l| l.label.clone()).unwrap_or_default(),
                label_color: important_label.map(|l| l.color.clone()).unwrap_or_default(),
                is_labeled: important_label.is_some(),
                is_keyword_match,
            });
        }
    }

    countdowns.sort_by_key(|c| (c.priority, c.days_remaining));

    let count = |p: Priority| countdowns.iter().filter(|c| c.priority == p).count();
    let statistics = CountdownStats {
        total: countdowns.len(),
        critical: count(Priority::Critical),
        urgent: count(Priority::Urgent),
        high: count(Priority::High),
    };

    CountdownReport {
        countdowns,
        statistics,
    }
}

#[cfg(test)]
mod tests {
    use daybook_store::DateLabel;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn notes(entries: &[(&str, &str)]) -> NoteMap {
        let mut notes = NoteMap::new();
        for (date, activity) in entries {
            notes
                .entry((*date).to_owned())
                .or_default()
                .push((*activity).to_owned());
        }
        notes
    }

    fn label(text: &str) -> DateLabel {
        DateLabel {
            label: text.to_owned(),
            color: "#dc3545".to_owned(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn priority_bands() {
        assert_eq!(Priority::from_days_remaining(0), Priority::Critical);
        assert_eq!(Priority::from_days_remaining(1), Priority::Critical);
        assert_eq!(Priority::from_days_remaining(3), Priority::Urgent);
        assert_eq!(Priority::from_days_remaining(7), Priority::High);
        assert_eq!(Priority::from_days_remaining(14), Priority::Medium);
        assert_eq!(Priority::from_days_remaining(15), Priority::Low);
    }

    #[test]
    fn keyword_matches_are_sorted_and_past_dates_skipped() {
        let notes = notes(&[
            ("2025-05-31", "exam yesterday"),
            ("2025-06-20", "thesis submission"),
            ("2025-06-02", "project deadline"),
            ("2025-06-03", "walk the dog"),
            ("2025-06-05", "dentist appointment"),
        ]);
        let report = countdowns(&notes, &LabelMap::new(), today());
        let dates: Vec<&str> = report.countdowns.iter().map(|c| c.date.as_str()).collect();
        assert_eq!(dates, ["2025-06-02", "2025-06-05", "2025-06-20"]);
        assert_eq!(report.countdowns[0].priority, Priority::Critical);
        assert_eq!(report.countdowns[0].priority_color, "#dc3545");
        assert_eq!(report.countdowns[1].priority, Priority::High);
        assert_eq!(report.countdowns[2].priority, Priority::Low);
        assert_eq!(
            report.statistics,
            CountdownStats {
                total: 3,
                critical: 1,
                urgent: 0,
                high: 1
            }
        );
    }

    #[test]
    fn important_label_marks_every_activity_of_the_date() {
        let notes = notes(&[("2025-06-04", "walk the dog"), ("2025-06-04", "groceries")]);
        let mut labels = LabelMap::new();
        labels.insert("2025-06-04".into(), label("Important Deadline"));
        let report = countdowns(&notes, &labels, today());
        assert_eq!(report.countdowns.len(), 2);
        let first = &report.countdowns[0];
        assert!(first.is_labeled);
        assert!(!first.is_keyword_match);
        assert_eq!(first.label, "Important Deadline");
        assert_eq!(first.priority, Priority::Urgent);
    }

    #[test]
    fn ordinary_label_is_not_reported() {
        let notes = notes(&[("2025-06-04", "walk the dog")]);
        let mut labels = LabelMap::new();
        labels.insert("2025-06-04".into(), label("Birthday"));
        let report = countdowns(&notes, &labels, today());
        assert!(report.countdowns.is_empty());
    }
}
