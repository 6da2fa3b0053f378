//! The rolling 7-day planning window.

use chrono::{Local, NaiveDate};
use serde::Serialize;

use daybook_store::calendar::{date_key, seven_days_from};

/// Seven contiguous dates starting at a given day, formatted `YYYY-MM-DD`.
///
/// Offset 0 is always the start day; plan labels such as "Monday" or
/// "週一" name offsets into this window, not calendar weekdays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WeekWindow {
    dates: Vec<String>,
}

impl WeekWindow {
    /// The window starting today (local time).
    pub fn current() -> Self {
        Self::starting(Local::now().date_naive())
    }

    /// The window starting at `start`.
    pub fn starting(start: NaiveDate) -> Self {
        Self {
            dates: seven_days_from(start).into_iter().map(date_key).collect(),
        }
    }

    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    pub fn contains(&self, date: &str) -> bool {
        self.dates.iter().any(|d| d == date)
    }
}

/// The seven dates starting today.
pub fn current_week() -> Vec<String> {
    WeekWindow::current().dates
}
