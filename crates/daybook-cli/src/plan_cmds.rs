//! CLI handlers for the planning and overview commands.
//!
//! Implements:
//! - `daybook plan <goal>`       -- generate and save a plan for the next seven days
//! - `daybook ask <question>`    -- ask the oracle about the saved schedule
//! - `daybook parse <file>`      -- dry-run the plan parser on a saved reply
//! - `daybook stats`             -- note statistics and upcoming deadlines
//! - `daybook week`              -- the current seven-day window

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;

use daybook_core::analytics::{CalendarStats, CountdownReport, calendar_stats, countdowns};
use daybook_core::assistant::answer_question;
use daybook_core::plan::{
    OraclePlanner, PlanOutcome, PlanSource, TemplatePlanner, generate_week_plan, preview_parse,
};
use daybook_core::{Oracle, WeekWindow, WithFallback};
use daybook_store::queries::{labels as label_queries, notes as note_queries};
use daybook_store::{JsonStore, NoteMap};

// -----------------------------------------------------------------------
// daybook plan <goal>
// -----------------------------------------------------------------------

pub async fn cmd_plan(store: &JsonStore, oracle: Arc<dyn Oracle>, goal: &str) -> Result<()> {
    let planner = WithFallback::new(OraclePlanner::new(oracle), TemplatePlanner);
    let outcome = generate_week_plan(store, &planner, goal, &WeekWindow::current())
        .await
        .context("failed to generate plan")?;
    print!("{}", render_outcome(&outcome));
    Ok(())
}

fn render_outcome(outcome: &PlanOutcome) -> String {
    let mut out = String::new();
    let source = match outcome.source {
        PlanSource::Oracle => "oracle",
        PlanSource::Fallback => "fallback template",
    };
    out.push_str(&format!(
        "Plan saved ({source}, {} days).\n\n",
        outcome.plan.len()
    ));
    out.push_str(&render_days(&outcome.plan));

    let dropped = outcome.parsed_plans.len().saturating_sub(outcome.plan.len());
    if dropped > 0 {
        out.push_str(&format!(
            "\n{dropped} of {} parsed days could not be placed in this week.\n",
            outcome.parsed_plans.len()
        ));
    }
    out
}

fn render_days(days: &NoteMap) -> String {
    let mut out = String::new();
    for (date, activities) in days {
        out.push_str(&format!("  {date}\n"));
        for activity in activities {
            out.push_str(&format!("    - {activity}\n"));
        }
    }
    out
}

// -----------------------------------------------------------------------
// daybook ask <question>
// -----------------------------------------------------------------------

pub async fn cmd_ask(store: &JsonStore, oracle: &dyn Oracle, question: &str) -> Result<()> {
    let answer = answer_question(store, oracle, question)
        .await
        .context("failed to answer question")?;
    println!("{}", answer.trim_end());
    Ok(())
}

// -----------------------------------------------------------------------
// daybook parse <file>
// -----------------------------------------------------------------------

pub fn cmd_parse(file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read reply file: {}", file.display()))?;
    let window = WeekWindow::current();
    let preview = preview_parse(&text, &window)
        .with_context(|| format!("failed to parse reply file: {}", file.display()))?;

    println!("Parsed {} day(s):", preview.parsed_plans.len());
    for (label, activities) in preview.parsed_plans.iter() {
        println!("  {label}: {}", activities.join(" | "));
    }
    println!();
    println!(
        "Mapped onto {} .. {}:",
        window.dates().first().map(String::as_str).unwrap_or("?"),
        window.dates().last().map(String::as_str).unwrap_or("?")
    );
    if preview.mapped_plans.is_empty() {
        println!("  (no day could be mapped)");
    } else {
        print!("{}", render_days(&preview.mapped_plans));
    }
    Ok(())
}

// -----------------------------------------------------------------------
// daybook stats
// -----------------------------------------------------------------------

pub fn cmd_stats(store: &JsonStore) -> Result<()> {
    let notes = note_queries::list_notes(store)?;
    let labels = label_queries::list_labels(store)?;
    let stats = calendar_stats(&notes, &WeekWindow::current());
    let report = countdowns(&notes, &labels, Local::now().date_naive());
    print!("{}", render_stats(&stats, &report));
    Ok(())
}

fn render_stats(stats: &CalendarStats, report: &CountdownReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("  Notes:            {}\n", stats.total_notes));
    out.push_str(&format!("  Days with notes:  {}\n", stats.total_days_with_notes));
    out.push_str(&format!("  This week:        {}\n", stats.current_week_notes));
    if let Some(day) = &stats.most_active_day {
        out.push_str(&format!(
            "  Most active day:  {} ({} notes)\n",
            day.date, day.note_count
        ));
    }
    if !stats.recent_activity.is_empty() {
        out.push_str("\nRecent:\n");
        for day in &stats.recent_activity {
            out.push_str(&format!("  {}  {} note(s)\n", day.date, day.note_count));
        }
    }
    if !report.countdowns.is_empty() {
        out.push_str(&format!(
            "\nDeadlines ({} critical, {} urgent, {} high):\n",
            report.statistics.critical, report.statistics.urgent, report.statistics.high
        ));
        for c in &report.countdowns {
            out.push_str(&format!(
                "  [{:?}] {} in {} day(s): {}\n",
                c.priority, c.date, c.days_remaining, c.activity
            ));
        }
    }
    out
}

// -----------------------------------------------------------------------
// daybook week
// -----------------------------------------------------------------------

pub fn cmd_week(store: &JsonStore) -> Result<()> {
    let notes = note_queries::list_notes(store)?;
    print!("{}", render_week(&WeekWindow::current(), &notes));
    Ok(())
}

fn render_week(window: &WeekWindow, notes: &NoteMap) -> String {
    let mut out = String::new();
    for date in window.dates() {
        match notes.get(date) {
            Some(activities) if !activities.is_empty() => {
                out.push_str(&format!("{date}\n"));
                for activity in activities {
                    out.push_str(&format!("    - {activity}\n"));
                }
            }
            _ => out.push_str(&format!("{date}  (free)\n")),
        }
    }
    out
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use daybook_test_utils::{ScriptedOracle, TestStore, note_map};

    use super::*;

    fn window() -> WeekWindow {
        WeekWindow::starting(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap())
    }

    #[test]
    fn week_marks_free_days() {
        let notes = note_map([("2025-06-03", &["swim"])]);
        let out = render_week(&window(), &notes);
        assert_eq!(out.lines().count(), 8);
        assert!(out.starts_with("2025-06-02  (free)\n2025-06-03\n    - swim\n"));
    }

    #[test]
    fn stats_render_includes_most_active_day() {
        let notes = note_map([("2025-06-02", &["a", "b"]), ("2025-06-04", &["c"])]);
        let stats = calendar_stats(&notes, &window());
        let report = CountdownReport {
            countdowns: Vec::new(),
            statistics: Default::default(),
        };
        let out = render_stats(&stats, &report);
        assert!(out.contains("Notes:            3"));
        assert!(out.contains("Most active day:  2025-06-02 (2 notes)"));
        assert!(!out.contains("Deadlines"));
    }

    #[tokio::test]
    async fn plan_command_writes_fallback_when_oracle_fails() {
        let ts = TestStore::new();
        let oracle: Arc<dyn Oracle> = Arc::new(ScriptedOracle::new().then_fail("offline"));

        cmd_plan(ts.store(), oracle, "piano").await.unwrap();

        let notes = note_queries::list_notes(ts.store()).unwrap();
        assert_eq!(notes.len(), 7);
        assert!(notes.values().all(|acts| acts.len() >= 2));
    }

    #[tokio::test]
    async fn plan_command_rejects_blank_goal() {
        let ts = TestStore::new();
        let oracle: Arc<dyn Oracle> = Arc::new(ScriptedOracle::replying("Monday: run"));
        assert!(cmd_plan(ts.store(), oracle, "   ").await.is_err());
        assert!(note_queries::list_notes(ts.store()).unwrap().is_empty());
    }

    #[test]
    fn parse_command_reads_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("reply.txt");
        std::fs::write(&path, "Monday: read\nTuesday: write").unwrap();
        cmd_parse(&path).unwrap();

        assert!(cmd_parse(&tmp.path().join("missing.txt")).is_err());
    }
}
