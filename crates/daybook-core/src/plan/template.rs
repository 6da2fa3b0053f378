//! Deterministic placeholder plan used when the oracle gives nothing usable.

use super::parser::DailyPlan;

/// Build the seven-day placeholder plan for `goal`.
///
/// Keys are the localized weekday labels, so the plan maps onto the window
/// exactly like an oracle reply in the requested format would.
pub fn fallback_plan(goal: &str) -> DailyPlan {
    let days: [(&str, [String; 2]); 7] = [
        ("週一", [format!("Start {goal} today"), "Set daily goals".to_owned()]),
        ("週二", [format!("Continue {goal} focus"), "Track progress".to_owned()]),
        ("週三", [format!("Mid-week {goal} review"), "Adjust plans if needed".to_owned()]),
        ("週四", [format!("Advance {goal} projects"), "Prepare for weekend".to_owned()]),
        ("週五", [format!("Complete {goal} tasks"), "Week review".to_owned()]),
        ("週六", [format!("Light {goal} activity"), "Rest and recharge".to_owned()]),
        ("週日", ["Plan next week".to_owned(), "Rest and prepare".to_owned()]),
    ];

    let mut plan = DailyPlan::new();
    for (label, activities) in days {
        plan.insert(label, activities.into());
    }
    plan
}
