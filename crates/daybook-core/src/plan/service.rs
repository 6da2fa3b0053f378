//! Plan service layer.
//!
//! Runs a [`Planner`], maps the labelled days onto the dates of a
//! [`WeekWindow`], and writes the mapped days to the note store in one write.

use serde::Serialize;
use tracing::{info, warn};

use daybook_store::queries::notes as note_queries;
use daybook_store::{JsonStore, NoteMap};

use crate::error::ServiceError;
use crate::window::WeekWindow;

use super::parser::{DailyPlan, parse_plan};
use super::planner::{PlanSource, Planner};
use super::weekday::map_day_label;

/// Result of [`generate_week_plan`].
#[derive(Debug, Clone, Serialize)]
pub struct PlanOutcome {
    /// Activities actually written, keyed by date.
    pub plan: NoteMap,
    /// The labelled plan before date mapping.
    pub parsed_plans: DailyPlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_response: Option<String>,
    pub source: PlanSource,
}

/// Result of [`preview_parse`]. Nothing is persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ParsePreview {
    pub original_response: String,
    pub parsed_plans: DailyPlan,
    pub mapped_plans: NoteMap,
    pub week_dates: WeekWindow,
}

/// Resolve every label of `days` against `window`.
///
/// Unmappable labels are dropped (the mapper logs them). When two labels
/// resolve to the same date, the later one wins.
pub fn map_plan(days: &DailyPlan, window: &WeekWindow) -> NoteMap {
    let mut mapped = NoteMap::new();
    for (label, activities) in days.iter() {
        let Some(date) = map_day_label(label, window.dates()) else {
            continue;
        };
        info!(label = %label, date = %date, count = activities.len(), "mapped day");
        mapped.insert(date.to_owned(), activities.to_vec());
    }
    mapped
}

/// Generate a plan for `goal` and write it into the store.
///
/// Each mapped date's notes are overwritten. An empty goal is rejected
/// before the planner runs.
pub async fn generate_week_plan<P: Planner + ?Sized>(
    store: &JsonStore,
    planner: &P,
    goal: &str,
    window: &WeekWindow,
) -> Result<PlanOutcome, ServiceError> {
    let goal = goal.trim();
    if goal.is_empty() {
        return Err(ServiceError::invalid("Please provide a planning goal"));
    }
    info!(goal = %goal, week = ?window.dates(), "generating plan");

    let draft = planner.plan(goal).await?;
    let plan = map_plan(&draft.days, window);
    if plan.is_empty() {
        warn!(goal = %goal, "no plan day could be mapped onto the window");
    } else {
        note_queries::replace_many(store, &plan)?;
    }

    Ok(PlanOutcome {
        plan,
        parsed_plans: draft.days,
        ai_response: draft.raw_response,
        source: draft.source,
    })
}

/// Parse and map a reply without touching the store.
pub fn preview_parse(text: &str, window: &WeekWindow) -> Result<ParsePreview, ServiceError> {
    if text.trim().is_empty() {
        return Err(ServiceError::invalid("Please provide a test response"));
    }
    let parsed_plans = parse_plan(text);
    let mapped_plans = map_plan(&parsed_plans, window);
    Ok(ParsePreview {
        original_response: text.to_owned(),
        parsed_plans,
        mapped_plans,
        week_dates: window.clone(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn window() -> WeekWindow {
        WeekWindow::starting(NaiveDate::from_ymd_opt(2025, 5, 5).unwrap())
    }

    #[test]
    fn maps_weekdays_and_drops_unmappable_labels() {
        let days = parse_plan("Monday: a\n12月25日: b\nDay 7: c\nDay 9: d");
        let mapped = map_plan(&days, &window());
        assert_eq!(mapped.len(), 2);
        assert_eq!(mapped["2025-05-05"], ["a"]);
        assert_eq!(mapped["2025-05-11"], ["c"]);
    }

    #[test]
    fn later_label_wins_on_same_date() {
        let days = parse_plan("Monday: a\n週一: b");
        let mapped = map_plan(&days, &window());
        assert_eq!(mapped["2025-05-05"], ["b"]);
    }

    #[test]
    fn preview_rejects_blank_text() {
        let err = preview_parse("  ", &window()).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[test]
    fn preview_reports_all_stages() {
        let preview = preview_parse("Tue: swim, read", &window()).unwrap();
        assert_eq!(preview.parsed_plans.get("Tue").unwrap(), ["swim", "read"]);
        assert_eq!(preview.mapped_plans["2025-05-06"], ["swim", "read"]);
        assert_eq!(preview.week_dates.dates().len(), 7);
    }
}
