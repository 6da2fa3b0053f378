//! CLI handlers for `daybook note` subcommands.

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};

use daybook_store::calendar::{date_key, parse_date_key};
use daybook_store::queries::notes as note_queries;
use daybook_store::{JsonStore, NoteMap};

use crate::NoteCommands;

pub fn run_note_command(command: NoteCommands, store: &JsonStore) -> Result<()> {
    match command {
        NoteCommands::Add { date, content } => {
            note_queries::append_note(store, &date, &content)?;
            println!("Note added to {date}.");
        }
        NoteCommands::List { year, month } => {
            let notes = match (year, month) {
                (Some(year), Some(month)) => note_queries::notes_for_month(store, year, month)?,
                _ => note_queries::list_notes(store)?,
            };
            if notes.is_empty() {
                println!("No notes found. Use `daybook note add <date> <text>` to add one.");
            } else {
                print!("{}", render_notes(&notes));
            }
        }
        NoteCommands::Delete { date, index, to } => cmd_delete(store, &date, index, to.as_deref())?,
    }
    Ok(())
}

fn cmd_delete(store: &JsonStore, date: &str, index: Option<usize>, to: Option<&str>) -> Result<()> {
    if let Some(end) = to {
        let start = parse_date_key(date)?;
        let end = parse_date_key(end)?;
        let report = note_queries::delete_range(store, start, end)
            .with_context(|| format!("failed to delete {date} .. {}", date_key(end)))?;
        println!(
            "Deleted {} days with {} total notes.",
            report.deleted_dates.len(),
            report.deleted_notes_count
        );
        return Ok(());
    }

    match index {
        Some(index) => {
            let removed = note_queries::delete_note(store, date, index)?;
            println!("Deleted note {index} from {date}: {removed}");
        }
        None => {
            let count = note_queries::delete_date(store, date)?;
            println!("Deleted {count} note(s) from {date}.");
        }
    }
    Ok(())
}

fn render_notes(notes: &NoteMap) -> String {
    let mut out = String::new();
    for (date, activities) in notes {
        out.push_str(&format!("{date}\n"));
        for (i, activity) in activities.iter().enumerate() {
            out.push_str(&format!("  [{i}] {activity}\n"));
        }
    }
    out
}

/// Write a couple of example notes for `today` and the following day.
///
/// Does nothing and returns `false` when the notes file already exists.
pub fn seed_sample_notes(store: &JsonStore, today: NaiveDate) -> Result<bool> {
    if store.notes_path().exists() {
        return Ok(false);
    }
    let tomorrow = today
        .checked_add_days(Days::new(1))
        .context("date out of range")?;

    let mut sample = NoteMap::new();
    sample.insert(
        date_key(today),
        vec![
            "Team meeting at 10:00 AM".to_owned(),
            "Lunch with colleagues".to_owned(),
            "Review project documents".to_owned(),
        ],
    );
    sample.insert(
        date_key(tomorrow),
        vec![
            "Morning workout".to_owned(),
            "Grocery shopping".to_owned(),
            "Prepare for weekend".to_owned(),
        ],
    );
    note_queries::replace_many(store, &sample)?;
    Ok(true)
}
