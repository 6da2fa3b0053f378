//! Read-only views over the stored calendar.
//!
//! All functions take already-loaded notes and labels plus an explicit
//! "today" or window, so reports are reproducible in tests. Only
//! [`analyze_time_allocation`] is async, because it runs a categorizer.

pub mod allocation;
pub mod countdown;
pub mod stats;
pub mod trends;

pub use allocation::{
    CategorizedActivity, CategoryInfo, CategorySlice, TimeAllocation, analyze_time_allocation,
    category_info,
};
pub use countdown::{Countdown, CountdownReport, CountdownStats, Priority, countdowns};
pub use stats::{CalendarStats, DayCount, calendar_stats};
pub use trends::{ActivityTrends, DailyTrend, activity_trends, trend_group};
