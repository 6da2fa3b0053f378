//! Date-key helpers shared by the store and the planning pipeline.
//!
//! Every persisted key is a `YYYY-MM-DD` string naming a real calendar date.

use std::sync::LazyLock;

use chrono::{Datelike, Days, NaiveDate};
use regex::Regex;

use crate::error::StoreError;

static DATE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date key regex is valid"));

/// Parse a `YYYY-MM-DD` key into a date.
///
/// Rejects keys with the wrong shape (`2024-1-5`) as well as impossible
/// dates (`2024-02-30`).
pub fn parse_date_key(key: &str) -> Result<NaiveDate, StoreError> {
    if !DATE_KEY.is_match(key) {
        return Err(StoreError::invalid(format!(
            "invalid date {key:?}; use YYYY-MM-DD"
        )));
    }
    NaiveDate::parse_from_str(key, "%Y-%m-%d")
        .map_err(|_| StoreError::invalid(format!("invalid date {key:?}; use YYYY-MM-DD")))
}

/// Format a date as a store key.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Every date from `start` through `end`, inclusive.
///
/// Fails when `start` is after `end`.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>, StoreError> {
    if start > end {
        return Err(StoreError::invalid(
            "start date must be before or equal to end date",
        ));
    }
    Ok(start.iter_days().take_while(|d| *d <= end).collect())
}

/// First and last day of a month.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), StoreError> {
    if !(1..=12).contains(&month) {
        return Err(StoreError::invalid("month must be between 1 and 12"));
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| StoreError::invalid(format!("year {year} is out of range")))?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| StoreError::invalid(format!("year {year} is out of range")))?;
    let last = next_first
        .pred_opt()
        .ok_or_else(|| StoreError::invalid(format!("year {year} is out of range")))?;
    Ok((first, last))
}

/// Every date key of a month.
pub fn month_date_keys(year: i32, month: u32) -> Result<Vec<String>, StoreError> {
    let (first, last) = month_bounds(year, month)?;
    Ok(days_inclusive(first, last)?.into_iter().map(date_key).collect())
}

/// The Monday starting the calendar week that contains `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// The seven dates starting at `start`.
pub fn seven_days_from(start: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take(7).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parse_accepts_well_formed_keys() {
        assert_eq!(parse_date_key("2024-12-20").unwrap(), d(2024, 12, 20));
    }

    #[test]
    fn parse_rejects_short_fields() {
        assert!(matches!(
            parse_date_key("2024-1-05"),
            Err(StoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn parse_rejects_impossible_dates() {
        assert!(parse_date_key("2023-02-29").is_err());
        assert!(parse_date_key("2024-13-01").is_err());
    }

    #[test]
    fn days_inclusive_counts_both_ends() {
        let days = days_inclusive(d(2024, 2, 27), d(2024, 3, 1)).unwrap();
        assert_eq!(days.len(), 4);
        assert_eq!(days[2], d(2024, 2, 29));
    }

    #[test]
    fn days_inclusive_rejects_reversed_range() {
        assert!(days_inclusive(d(2024, 3, 2), d(2024, 3, 1)).is_err());
    }

    #[test]
    fn month_bounds_handles_december_and_leap_years() {
        assert_eq!(
            month_bounds(2024, 12).unwrap(),
            (d(2024, 12, 1), d(2024, 12, 31))
        );
        assert_eq!(month_bounds(2024, 2).unwrap().1, d(2024, 2, 29));
        assert_eq!(month_bounds(2023, 2).unwrap().1, d(2023, 2, 28));
    }

    #[test]
    fn month_bounds_rejects_bad_month() {
        assert!(month_bounds(2024, 0).is_err());
        assert!(month_bounds(2024, 13).is_err());
    }

    #[test]
    fn month_date_keys_lists_every_day() {
        let keys = month_date_keys(2024, 4).unwrap();
        assert_eq!(keys.len(), 30);
        assert_eq!(keys.first().unwrap(), "2024-04-01");
        assert_eq!(keys.last().unwrap(), "2024-04-30");
    }

    #[test]
    fn monday_of_walks_back_to_monday() {
        // 2024-12-20 is a Friday.
        assert_eq!(monday_of(d(2024, 12, 20)), d(2024, 12, 16));
        assert_eq!(monday_of(d(2024, 12, 16)), d(2024, 12, 16));
        assert_eq!(monday_of(d(2024, 12, 22)), d(2024, 12, 16));
    }

    #[test]
    fn seven_days_are_contiguous() {
        let days = seven_days_from(d(2024, 12, 30));
        assert_eq!(days.len(), 7);
        assert_eq!(days[6], d(2025, 1, 5));
    }
}
