//! Note counts over the whole calendar.

use serde::Serialize;

use daybook_store::NoteMap;

use crate::window::WeekWindow;

/// Number of recent dates reported.
const RECENT_DAYS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub date: String,
    pub note_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarStats {
    pub total_notes: usize,
    pub total_days_with_notes: usize,
    pub current_week_notes: usize,
    pub most_active_day: Option<DayCount>,
    pub recent_activity: Vec<DayCount>,
}

pub fn calendar_stats(notes: &NoteMap, window: &WeekWindow) -> CalendarStats {
    let total_notes = notes.values().map(Vec::len).sum();
    let current_week_notes = window
        .dates()
        .iter()
        .filter_map(|date| notes.get(date))
        .map(Vec::len)
        .sum();

    // Earliest date wins ties.
    let mut most_active_day: Option<DayCount> = None;
    for (date, activities) in notes {
        if most_active_day
            .as_ref()
            .is_none_or(|best| activities.len() > best.note_count)
        {
            most_active_day = Some(DayCount {
                date: date.clone(),
                note_count: activities.len(),
            });
        }
    }

    let recent_activity = notes
        .iter()
        .rev()
        .take(RECENT_DAYS)
        .map(|(date, activities)| DayCount {
            date: date.clone(),
            note_count: activities.len(),
        })
        .collect();

    CalendarStats {
        total_notes,
        total_days_with_notes: notes.len(),
        current_week_notes,
        most_active_day,
        recent_activity,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn notes(entries: &[(&str, usize)]) -> NoteMap {
        entries
            .iter()
            .map(|(date, n)| ((*date).to_owned(), vec!["x".to_owned(); *n]))
            .collect()
    }

    #[test]
    fn empty_calendar() {
        let window = WeekWindow::starting(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let stats = calendar_stats(&NoteMap::new(), &window);
        assert_eq!(stats.total_notes, 0);
        assert!(stats.most_active_day.is_none());
        assert!(stats.recent_activity.is_empty());
    }

    #[test]
    fn counts_totals_week_and_ties() {
        let window = WeekWindow::starting(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let notes = notes(&[
            ("2024-12-30", 3),
            ("2025-01-01", 2),
            ("2025-01-07", 3),
            ("2025-01-08", 1),
        ]);
        let stats = calendar_stats(&notes, &window);
        assert_eq!(stats.total_notes, 9);
        assert_eq!(stats.total_days_with_notes, 4);
        assert_eq!(stats.current_week_notes, 5);
        assert_eq!(
            stats.most_active_day,
            Some(DayCount {
                date: "2024-12-30".into(),
                note_count: 3
            })
        );
        assert_eq!(stats.recent_activity[0].date, "2025-01-08");
    }

    #[test]
    fn recent_activity_is_capped_at_five() {
        let window = WeekWindow::starting(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let notes = notes(&[
            ("2025-01-01", 1),
            ("2025-01-02", 1),
            ("2025-01-03", 1),
            ("2025-01-04", 1),
            ("2025-01-05", 1),
            ("2025-01-06", 1),
        ]);
        let recent = calendar_stats(&notes, &window).recent_activity;
        let dates: Vec<&str> = recent.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(
            dates,
            ["2025-01-06", "2025-01-05", "2025-01-04", "2025-01-03", "2025-01-02"]
        );
    }
}
