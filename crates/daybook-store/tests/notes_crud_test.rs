//! Integration tests for note queries against a temporary data directory.

use chrono::NaiveDate;

use daybook_store::StoreError;
use daybook_store::queries::notes;
use daybook_test_utils::{TestStore, note_map};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn append_then_list() {
    let ts = TestStore::new();
    notes::append_note(ts.store(), "2025-01-05", "gym").unwrap();
    notes::append_note(ts.store(), "2025-01-05", "read").unwrap();
    notes::append_note(ts.store(), "2025-01-06", "rest").unwrap();

    let all = notes::list_notes(ts.store()).unwrap();
    assert_eq!(all["2025-01-05"], ["gym", "read"]);
    assert_eq!(all.len(), 2);
}

#[test]
fn invalid_date_keys_are_rejected() {
    let ts = TestStore::new();
    for bad in ["2025-1-5", "2025-02-30", "tomorrow", ""] {
        let err = notes::append_note(ts.store(), bad, "x").unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)), "{bad} accepted");
    }
    assert!(notes::list_notes(ts.store()).unwrap().is_empty());
    assert!(!ts.store().notes_path().exists());
}

#[test]
fn notes_file_is_pretty_utf8_json() {
    let ts = TestStore::new();
    notes::append_note(ts.store(), "2025-01-05", "讀書").unwrap();
    let raw = std::fs::read_to_string(ts.store().notes_path()).unwrap();
    assert!(raw.contains("讀書"));
    assert!(raw.contains('\n'));
}

#[test]
fn replace_and_month_listing() {
    let ts = TestStore::with_notes(&note_map([
        ("2024-02-29", &["leap"]),
        ("2024-03-01", &["march"]),
    ]));
    notes::replace_notes(ts.store(), "2024-02-29", vec!["a".into(), "b".into()]).unwrap();

    let feb = notes::notes_for_month(ts.store(), 2024, 2).unwrap();
    assert_eq!(feb.len(), 1);
    assert_eq!(feb["2024-02-29"], ["a", "b"]);

    let err = notes::notes_for_month(ts.store(), 2024, 13).unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));
}

#[test]
fn deleting_last_note_removes_the_date() {
    let ts = TestStore::with_notes(&note_map([("2025-01-05", &["only"])]));
    let removed = notes::delete_note(ts.store(), "2025-01-05", 0).unwrap();
    assert_eq!(removed, "only");
    assert!(notes::list_notes(ts.store()).unwrap().is_empty());

    let err = notes::delete_note(ts.store(), "2025-01-05", 0).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn delete_date_reports_count_or_not_found() {
    let ts = TestStore::with_notes(&note_map([("2025-01-05", &["a", "b"])]));
    assert_eq!(notes::delete_date(ts.store(), "2025-01-05").unwrap(), 2);
    assert!(matches!(
        notes::delete_date(ts.store(), "2025-01-05").unwrap_err(),
        StoreError::NotFound(_)
    ));
}

#[test]
fn range_deletion_is_inclusive() {
    let ts = TestStore::with_notes(&note_map([
        ("2025-01-04", &["before"]),
        ("2025-01-05", &["a", "b"]),
        ("2025-01-07", &["c"]),
        ("2025-01-08", &["after"]),
    ]));
    let report = notes::delete_range(ts.store(), day(2025, 1, 5), day(2025, 1, 7)).unwrap();
    assert_eq!(report.deleted_dates, ["2025-01-05", "2025-01-07"]);
    assert_eq!(report.deleted_notes_count, 3);

    let left = notes::list_notes(ts.store()).unwrap();
    assert_eq!(left.len(), 2);

    let err = notes::delete_range(ts.store(), day(2025, 1, 5), day(2025, 1, 7)).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    let err = notes::delete_range(ts.store(), day(2025, 1, 9), day(2025, 1, 1)).unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));
}

#[test]
fn multiple_dates_deletion() {
    let ts = TestStore::with_notes(&note_map([
        ("2025-01-05", &["a"]),
        ("2025-01-09", &["b", "c"]),
    ]));
    let err = notes::delete_dates(ts.store(), &[]).unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));

    let report = notes::delete_dates(
        ts.store(),
        &["2025-01-09".to_owned(), "2030-01-01".to_owned()],
    )
    .unwrap();
    assert_eq!(report.deleted_dates, ["2025-01-09"]);
    assert_eq!(report.deleted_notes_count, 2);

    let err = notes::delete_dates(ts.store(), &["2030-01-01".to_owned()]).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn week_and_month_deletion_tolerate_empty_periods() {
    let ts = TestStore::with_notes(&note_map([
        ("2025-03-03", &["mon"]),
        ("2025-03-09", &["sun"]),
        ("2025-03-10", &["next mon"]),
        ("2025-04-01", &["april"]),
    ]));
    let (report, end) = notes::delete_week(ts.store(), day(2025, 3, 3)).unwrap();
    assert_eq!(end, day(2025, 3, 9));
    assert_eq!(report.deleted_dates, ["2025-03-03", "2025-03-09"]);

    let (empty, _) = notes::delete_week(ts.store(), day(2025, 3, 3)).unwrap();
    assert!(empty.is_empty());

    let report = notes::delete_month(ts.store(), 2025, 3).unwrap();
    assert_eq!(report.deleted_dates, ["2025-03-10"]);
    assert!(notes::delete_month(ts.store(), 2025, 3).unwrap().is_empty());

    let left = notes::list_notes(ts.store()).unwrap();
    assert_eq!(left.keys().collect::<Vec<_>>(), ["2025-04-01"]);
}

#[test]
fn corrupt_notes_file_reads_as_empty() {
    let ts = TestStore::new();
    std::fs::write(ts.store().notes_path(), "{ not json").unwrap();
    assert!(notes::list_notes(ts.store()).unwrap().is_empty());

    notes::append_note(ts.store(), "2025-01-01", "fresh start").unwrap();
    assert_eq!(notes::list_notes(ts.store()).unwrap().len(), 1);
}
