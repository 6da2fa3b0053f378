//! Query functions for the labels file.

use chrono::{Local, NaiveDateTime};

use crate::calendar::{self, parse_date_key};
use crate::error::StoreError;
use crate::file::JsonStore;
use crate::models::{
    DEFAULT_LABEL_COLOR, DateLabel, IMPORTANT_LABEL, IMPORTANT_LABEL_COLOR, LabelMap,
    validate_color,
};

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Every label, keyed by date.
pub fn list_labels(store: &JsonStore) -> Result<LabelMap, StoreError> {
    store.load_labels()
}

/// Labels for the dates of one month.
pub fn labels_for_month(store: &JsonStore, year: i32, month: u32) -> Result<LabelMap, StoreError> {
    let keys = calendar::month_date_keys(year, month)?;
    let labels = store.load_labels()?;
    Ok(keys
        .into_iter()
        .filter_map(|key| labels.get(&key).map(|label| (key, label.clone())))
        .collect())
}

/// Create or overwrite the label of a date.
///
/// `color` defaults to [`DEFAULT_LABEL_COLOR`] and must be `#rrggbb`.
pub fn save_label(
    store: &JsonStore,
    date: &str,
    label: &str,
    color: Option<&str>,
) -> Result<DateLabel, StoreError> {
    parse_date_key(date)?;
    let color = color.unwrap_or(DEFAULT_LABEL_COLOR);
    validate_color(color)?;

    let record = DateLabel {
        label: label.to_owned(),
        color: color.to_owned(),
        created_at: Some(now()),
        updated_at: None,
    };
    store.modify_labels(|labels| {
        labels.insert(date.to_owned(), record.clone());
        Ok(record)
    })
}

/// Change the text (and optionally the color) of an existing label.
pub fn update_label(
    store: &JsonStore,
    date: &str,
    label: &str,
    color: Option<&str>,
) -> Result<DateLabel, StoreError> {
    if let Some(color) = color {
        validate_color(color)?;
    }
    store.modify_labels(|labels| {
        let existing = labels
            .get_mut(date)
            .ok_or_else(|| StoreError::not_found("Label not found for this date"))?;
        existing.label = label.to_owned();
        if let Some(color) = color {
            existing.color = color.to_owned();
        }
        existing.updated_at = Some(now());
        Ok(existing.clone())
    })
}

/// Remove the label of a date.
pub fn delete_label(store: &JsonStore, date: &str) -> Result<DateLabel, StoreError> {
    store.modify_labels(|labels| {
        labels
            .remove(date)
            .ok_or_else(|| StoreError::not_found("Label not found for this date"))
    })
}

/// Mark a date as an important deadline, creating the label if needed.
pub fn mark_important(store: &JsonStore, date: &str) -> Result<DateLabel, StoreError> {
    parse_date_key(date)?;
    store.modify_labels(|labels| {
        let record = match labels.get_mut(date) {
            Some(existing) => {
                existing.label = IMPORTANT_LABEL.to_owned();
                existing.color = IMPORTANT_LABEL_COLOR.to_owned();
                existing.updated_at = Some(now());
                existing.clone()
            }
            None => {
                let record = DateLabel {
                    label: IMPORTANT_LABEL.to_owned(),
                    color: IMPORTANT_LABEL_COLOR.to_owned(),
                    created_at: Some(now()),
                    updated_at: None,
                };
                labels.insert(date.to_owned(), record.clone());
                record
            }
        };
        Ok(record)
    })
}

/// Remove the label of a date, but only when it marks importance.
pub fn unmark_important(store: &JsonStore, date: &str) -> Result<(), StoreError> {
    store.modify_labels(|labels| {
        let existing = labels
            .get(date)
            .ok_or_else(|| StoreError::not_found("No label found for this date"))?;
        if !existing.is_important() {
            return Err(StoreError::invalid("This date is not marked as important"));
        }
        labels.remove(date);
        Ok(())
    })
}
