//! Weekly plan prompt construction.

use super::weekday::LOCALIZED_WEEKDAYS;

/// Build the prompt asking the oracle for a seven-day plan toward `goal`.
///
/// The reply format names one localized weekday label per line with
/// activities separated by `、`; the first label stands for today. The
/// parser also accepts several looser formats, but this is the one asked for.
pub fn build_plan_prompt(goal: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "As an AI calendar assistant, please create a detailed weekly schedule based on this goal: \"{goal}\"\n\n"
    ));
    prompt.push_str(
        "The schedule should start from TODAY and cover the next 7 days. \
         Please provide a structured plan with the following format:\n\n",
    );
    for label in LOCALIZED_WEEKDAYS {
        prompt.push_str(&format!("{label}: [activities separated by 、]\n"));
    }
    prompt.push('\n');
    prompt.push_str(
        "Note: The first day (週一) represents TODAY, and the schedule covers the next 7 days.\n\
         Make sure each day has 2-4 specific, actionable activities that align with the goal.\n\
         Keep activities concise but descriptive.\n\
         Only respond with the schedule in the exact format requested.\n",
    );

    prompt
}
