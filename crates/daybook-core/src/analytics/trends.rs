//! Daily activity counts over the last thirty days.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use daybook_store::NoteMap;
use daybook_store::calendar::date_key;

use crate::categorize::presets::{contains_any, library};

/// Days looked back from today; the report covers this many plus today.
pub const TREND_DAYS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTrend {
    pub date: String,
    pub total_activities: usize,
    /// Activities per keyword group. Unmatched activities are only counted
    /// in `total_activities`.
    pub categories: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityTrends {
    pub trends: Vec<DailyTrend>,
    pub period: &'static str,
}

/// The first trend group whose keywords appear in `activity`.
pub fn trend_group(activity: &str) -> Option<&'static str> {
    let lowered = activity.to_lowercase();
    library()
        .trend_groups()
        .find(|(_, keywords)| contains_any(&lowered, keywords))
        .map(|(name, _)| name)
}

/// One entry per day from `today - 30` through `today`.
pub fn activity_trends(notes: &NoteMap, today: NaiveDate) -> ActivityTrends {
    let start = today.checked_sub_days(Days::new(TREND_DAYS)).unwrap_or(today);
    let trends = start
        .iter_days()
        .take_while(|day| *day <= today)
        .map(|day| {
            let date = date_key(day);
            let mut categories: BTreeMap<String, usize> = library()
                .trend_groups()
                .map(|(name, _)| (name.to_owned(), 0))
                .collect();
            let activities = notes.get(&date).map(Vec::as_slice).unwrap_or_default();
            for activity in activities {
                if let Some(group) = trend_group(activity) {
                    *categories.entry(group.to_owned()).or_default() += 1;
                }
            }
            DailyTrend {
                date,
                total_activities: activities.len(),
                categories,
            }
        })
        .collect();

    ActivityTrends {
        trends,
        period: "30_days",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn covers_thirty_one_days_ending_today() {
        let report = activity_trends(&NoteMap::new(), today());
        assert_eq!(report.trends.len(), 31);
        assert_eq!(report.trends[0].date, "2025-02-08");
        assert_eq!(report.trends[30].date, "2025-03-10");
        assert_eq!(report.period, "30_days");
        assert_eq!(report.trends[0].categories.len(), 5);
    }

    #[test]
    fn first_matching_group_wins() {
        // "project" is both a study and a work keyword; study is earlier.
        assert_eq!(trend_group("Project kickoff"), Some("study"));
        assert_eq!(trend_group("Team meeting"), Some("work"));
        assert_eq!(trend_group("Coffee with Sam"), Some("social"));
        assert_eq!(trend_group("groceries"), None);
    }

    #[test]
    fn unmatched_activities_count_only_in_total() {
        let mut notes = NoteMap::new();
        notes.insert(
            "2025-03-09".into(),
            vec!["gym".into(), "groceries".into(), "Team meeting".into()],
        );
        notes.insert("2024-01-01".into(), vec!["gym".into()]);
        let report = activity_trends(&notes, today());
        let day = report.trends.iter().find(|d| d.date == "2025-03-09").unwrap();
        assert_eq!(day.total_activities, 3);
        assert_eq!(day.categories["exercise"], 1);
        assert_eq!(day.categories["work"], 1);
        assert_eq!(day.categories.values().sum::<usize>(), 2);
    }
}
