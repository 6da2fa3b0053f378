//! CLI handlers for `daybook label` subcommands.

use anyhow::Result;

use daybook_store::queries::labels as label_queries;
use daybook_store::{JsonStore, LabelMap};

use crate::LabelCommands;

pub fn run_label_command(command: LabelCommands, store: &JsonStore) -> Result<()> {
    match command {
        LabelCommands::Set {
            date,
            label,
            color,
            important,
        } => {
            if important {
                let saved = label_queries::mark_important(store, &date)?;
                println!("{date} marked as \"{}\".", saved.label);
            } else {
                let label = label.unwrap_or_default();
                let saved = label_queries::save_label(store, &date, &label, color.as_deref())?;
                println!("Label set on {date}: {} ({})", saved.label, saved.color);
            }
        }
        LabelCommands::Delete { date, important } => {
            if important {
                label_queries::unmark_important(store, &date)?;
                println!("Important marking removed from {date}.");
            } else {
                let removed = label_queries::delete_label(store, &date)?;
                println!("Label \"{}\" removed from {date}.", removed.label);
            }
        }
        LabelCommands::List { year, month } => {
            let labels = match (year, month) {
                (Some(year), Some(month)) => label_queries::labels_for_month(store, year, month)?,
                _ => label_queries::list_labels(store)?,
            };
            if labels.is_empty() {
                println!("No labels found.");
            } else {
                print!("{}", render_labels(&labels));
            }
        }
    }
    Ok(())
}

fn render_labels(labels: &LabelMap) -> String {
    let mut out = String::new();
    for (date, label) in labels {
        let marker = if label.is_important() { " !" } else { "" };
        out.push_str(&format!(
            "{date}  {:<8} {}{marker}\n",
            label.color, label.label
        ));
    }
    out
}
