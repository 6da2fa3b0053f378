//! Weekly plans: prompt, reply parser, day-label mapping, fallback, service.

pub mod parser;
pub mod planner;
pub mod prompt;
pub mod service;
pub mod template;
pub mod weekday;

pub use parser::{DailyPlan, match_day_line, parse_plan, split_activities};
pub use planner::{OraclePlanner, PlanDraft, PlanError, PlanSource, Planner, TemplatePlanner};
pub use prompt::build_plan_prompt;
pub use service::{ParsePreview, PlanOutcome, generate_week_plan, map_plan, preview_parse};
pub use template::fallback_plan;
pub use weekday::{LOCALIZED_WEEKDAYS, map_day_label};
