//! Free-form questions about the stored schedule.
//!
//! Unlike planning and categorization there is no fallback answer, so an
//! oracle failure is returned to the caller.

use tracing::{error, info};

use daybook_store::queries::notes as note_queries;
use daybook_store::{JsonStore, NoteMap};

use crate::error::ServiceError;
use crate::oracle::Oracle;

/// Summary used when the store holds no notes.
pub const EMPTY_SCHEDULE: &str = "Currently no scheduled activities.";

/// One `date: a、b、c` line per stored date, in date order.
pub fn schedule_summary(notes: &NoteMap) -> String {
    if notes.is_empty() {
        return EMPTY_SCHEDULE.to_owned();
    }
    notes
        .iter()
        .map(|(date, activities)| format!("{date}: {}", activities.join("、")))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_question_prompt(schedule: &str, question: &str) -> String {
    let mut prompt = String::new();
    prompt.push_str("You are an AI calendar assistant. Here is the user's current schedule:\n");
    prompt.push_str(&format!("{schedule}\n\n"));
    prompt.push_str(&format!("User's question: {question}\n\n"));
    prompt.push_str(
        "Please provide a helpful, personalized response based on their schedule. \
         If they're asking for advice, consider their current commitments and suggest improvements. \
         If they're asking about specific dates or activities, provide relevant information. \
         Keep your response concise but informative. \
         Respond in a friendly, helpful tone.\n",
    );
    prompt
}

/// Answer `question` with the whole schedule as context.
pub async fn answer_question<O: Oracle + ?Sized>(
    store: &JsonStore,
    oracle: &O,
    question: &str,
) -> Result<String, ServiceError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(ServiceError::invalid("Please provide a question"));
    }
    info!(question = %question, "answering schedule question");

    let notes = note_queries::list_notes(store)?;
    let prompt = build_question_prompt(&schedule_summary(&notes), question);
    let answer = oracle.generate(&prompt).await.map_err(|err| {
        error!(oracle = oracle.name(), error = %err, "schedule question failed");
        err
    })?;

    let preview: String = answer.chars().take(200).collect();
    info!(preview = %preview, "schedule answer received");
    Ok(answer)
}
