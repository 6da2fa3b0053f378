//! Planning and categorization pipeline for daybook.
//!
//! Goal text flows one way: prompt -> oracle reply -> parsed [`plan::DailyPlan`]
//! -> dates of the current [`window::WeekWindow`] -> the note store. Every
//! step except the oracle call is a pure function; the oracle sits behind the
//! [`oracle::Oracle`] trait and its failures are absorbed by
//! [`fallback::WithFallback`].

pub mod analytics;
pub mod assistant;
pub mod categorize;
pub mod error;
pub mod fallback;
pub mod oracle;
pub mod plan;
pub mod window;

pub use error::ServiceError;
pub use fallback::WithFallback;
pub use oracle::{Oracle, OracleError};
pub use window::WeekWindow;
