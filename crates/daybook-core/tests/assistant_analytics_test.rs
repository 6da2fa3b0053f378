//! Integration tests for schedule Q&A and the categorizing analytics.

use std::sync::Arc;

use chrono::NaiveDate;

use daybook_core::analytics::analyze_time_allocation;
use daybook_core::assistant::answer_question;
use daybook_core::categorize::{Category, KeywordCategorizer, OracleCategorizer};
use daybook_core::{OracleError, ServiceError, WeekWindow, WithFallback};
use daybook_test_utils::{ScriptedOracle, TestStore, note_map};

#[tokio::test]
async fn answer_includes_schedule_in_prompt() {
    let ts = TestStore::with_notes(&note_map([("2025-04-01", &["gym", "read"])]));
    let oracle = ScriptedOracle::replying("You have a balanced day.");

    let answer = answer_question(ts.store(), &oracle, "How is my Tuesday?")
        .await
        .unwrap();

    assert_eq!(answer, "You have a balanced day.");
    let prompt = &oracle.prompts()[0];
    assert!(prompt.contains("2025-04-01: gym、read"));
    assert!(prompt.contains("User's question: How is my Tuesday?"));
}

#[tokio::test]
async fn empty_store_uses_placeholder_summary() {
    let ts = TestStore::new();
    let oracle = ScriptedOracle::replying("Nothing planned yet.");

    answer_question(ts.store(), &oracle, "Anything today?")
        .await
        .unwrap();

    assert!(oracle.prompts()[0].contains("Currently no scheduled activities."));
}

#[tokio::test]
async fn oracle_failure_is_surfaced() {
    let ts = TestStore::new();
    let oracle = ScriptedOracle::new().then_fail("quota exceeded");

    let err = answer_question(ts.store(), &oracle, "Hello?")
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Oracle(OracleError::Request(_))));
    assert!(err.to_string().contains("quota exceeded"));
}

#[tokio::test]
async fn blank_question_is_rejected_before_the_oracle() {
    let ts = TestStore::new();
    let oracle = ScriptedOracle::replying("unused");

    let err = answer_question(ts.store(), &oracle, "\n ").await.unwrap_err();

    assert!(matches!(err, ServiceError::InvalidInput(_)));
    assert_eq!(oracle.calls(), 0);
}

#[tokio::test]
async fn allocation_mixes_oracle_and_keyword_results() {
    let notes = note_map([("2025-04-01", &["mystery task", "light jog"])]);
    // First activity gets a usable oracle answer; the second gets garbage
    // and falls through to keywords.
    let oracle = Arc::new(
        ScriptedOracle::new()
            .then_reply("Category: study\nIntensity: 15\nReason: focused work")
            .then_reply("???"),
    );
    let categorizer = WithFallback::new(
        OracleCategorizer::new(Arc::clone(&oracle)),
        KeywordCategorizer::seeded(4),
    );
    let window = WeekWindow::starting(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());

    let report = analyze_time_allocation(&notes, &categorizer, &window)
        .await
        .unwrap();

    assert_eq!(oracle.calls(), 2);
    assert_eq!(report.total_activities, 2);
    let study = report
        .chart_data
        .iter()
        .find(|s| s.category == Category::Study)
        .unwrap();
    assert_eq!(study.details[0].intensity.get(), 10);
    let exercise = report
        .chart_data
        .iter()
        .find(|s| s.category == Category::Exercise)
        .unwrap();
    assert!((1..=3).contains(&exercise.details[0].intensity.get()));
    assert_eq!(report.weekly_analysis["2025-04-01"][&Category::Study], 1);
}

#[tokio::test]
async fn exhausted_oracle_still_categorizes_everything() {
    let notes = note_map([("2025-04-02", &["nap", "homework", "swim"])]);
    let categorizer = WithFallback::new(
        OracleCategorizer::new(ScriptedOracle::new()),
        KeywordCategorizer::seeded(8),
    );
    let window = WeekWindow::starting(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());

    let report = analyze_time_allocation(&notes, &categorizer, &window)
        .await
        .unwrap();

    assert_eq!(report.total_activities, 3);
    assert_eq!(report.chart_data.len(), 3);
    for slice in &report.chart_data {
        assert!((33.0..=33.4).contains(&slice.percentage));
    }
}
