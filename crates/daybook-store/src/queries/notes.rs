//! Query functions for the notes file.

use chrono::{Days, NaiveDate};

use crate::calendar::{self, date_key, days_inclusive, parse_date_key};
use crate::error::StoreError;
use crate::file::JsonStore;
use crate::models::{DeletionReport, NoteMap};

/// Every note, keyed by date.
pub fn list_notes(store: &JsonStore) -> Result<NoteMap, StoreError> {
    store.load_notes()
}

/// Notes for the dates of one month.
pub fn notes_for_month(store: &JsonStore, year: i32, month: u32) -> Result<NoteMap, StoreError> {
    let keys = calendar::month_date_keys(year, month)?;
    let notes = store.load_notes()?;
    Ok(keys
        .into_iter()
        .filter_map(|key| notes.get(&key).map(|acts| (key, acts.clone())))
        .collect())
}

/// Append one note to a date.
pub fn append_note(store: &JsonStore, date: &str, content: &str) -> Result<(), StoreError> {
    parse_date_key(date)?;
    store.modify_notes(|notes| {
        notes
            .entry(date.to_owned())
            .or_default()
            .push(content.to_owned());
        Ok(())
    })
}

/// Replace every note of a date.
pub fn replace_notes(store: &JsonStore, date: &str, contents: Vec<String>) -> Result<(), StoreError> {
    parse_date_key(date)?;
    store.modify_notes(|notes| {
        notes.insert(date.to_owned(), contents);
        Ok(())
    })
}

/// Replace the notes of several dates in a single write.
///
/// All keys are validated before anything is written.
pub fn replace_many(store: &JsonStore, entries: &NoteMap) -> Result<(), StoreError> {
    for date in entries.keys() {
        parse_date_key(date)?;
    }
    store.modify_notes(|notes| {
        for (date, activities) in entries {
            notes.insert(date.clone(), activities.clone());
        }
        Ok(())
    })
}

/// Delete the note at `index` on `date`, returning its text.
///
/// The date disappears from the store once its last note is removed.
pub fn delete_note(store: &JsonStore, date: &str, index: usize) -> Result<String, StoreError> {
    store.modify_notes(|notes| {
        let list = notes
            .get_mut(date)
            .filter(|list| index < list.len())
            .ok_or_else(|| StoreError::not_found("Note not found"))?;
        let removed = list.remove(index);
        if list.is_empty() {
            notes.remove(date);
        }
        Ok(removed)
    })
}

/// Delete every note of one date, returning how many were removed.
pub fn delete_date(store: &JsonStore, date: &str) -> Result<usize, StoreError> {
    store.modify_notes(|notes| {
        notes
            .remove(date)
            .map(|removed| removed.len())
            .ok_or_else(|| StoreError::not_found("No notes found for this date"))
    })
}

/// Delete every note from `start` through `end`.
///
/// Fails with `NotFound` when the range holds no notes.
pub fn delete_range(
    store: &JsonStore,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<DeletionReport, StoreError> {
    let days = days_inclusive(start, end)?;
    store.modify_notes(|notes| {
        let report = take_days(notes, &days);
        if report.is_empty() {
            return Err(StoreError::not_found(
                "No notes found in the specified date range",
            ));
        }
        Ok(report)
    })
}

/// Delete the notes of each listed date.
///
/// Fails with `InvalidInput` for an empty list and `NotFound` when none of
/// the dates hold notes.
pub fn delete_dates(store: &JsonStore, dates: &[String]) -> Result<DeletionReport, StoreError> {
    if dates.is_empty() {
        return Err(StoreError::invalid("Please provide at least one date"));
    }
    store.modify_notes(|notes| {
        let mut report = DeletionReport::default();
        for date in dates {
            report.take(notes, date);
        }
        if report.is_empty() {
            return Err(StoreError::not_found(
                "No notes found for the specified dates",
            ));
        }
        Ok(report)
    })
}

/// Delete the seven days starting at `start`. Returns the report and the
/// last day of the week. An empty week is not an error.
pub fn delete_week(
    store: &JsonStore,
    start: NaiveDate,
) -> Result<(DeletionReport, NaiveDate), StoreError> {
    let end = start
        .checked_add_days(Days::new(6))
        .ok_or_else(|| StoreError::invalid("week start is out of range"))?;
    let days = days_inclusive(start, end)?;
    let report = store.modify_notes(|notes| Ok(take_days(notes, &days)))?;
    Ok((report, end))
}

/// Delete every note in one month. An empty month is not an error.
pub fn delete_month(store: &JsonStore, year: i32, month: u32) -> Result<DeletionReport, StoreError> {
    let (first, last) = calendar::month_bounds(year, month)?;
    let days = days_inclusive(first, last)?;
    store.modify_notes(|notes| Ok(take_days(notes, &days)))
}

fn take_days(notes: &mut NoteMap, days: &[NaiveDate]) -> DeletionReport {
    let mut report = DeletionReport::default();
    for day in days {
        report.take(notes, &date_key(*day));
    }
    report
}
