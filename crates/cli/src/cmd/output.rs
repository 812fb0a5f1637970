//! Shared output formatting for query commands.

use notegraph_core::Note;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Formatted note for JSON output.
#[derive(Debug, Serialize)]
pub struct NoteOutput {
    pub path: String,
    pub title: String,
    pub modified: String,
}

impl From<&Note> for NoteOutput {
    fn from(note: &Note) -> Self {
        Self {
            path: note.path.clone(),
            title: note.title.clone(),
            modified: note.modified_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

#[derive(Tabled)]
struct NoteRow<'a> {
    #[tabled(rename = "Path")]
    path: &'a str,
    #[tabled(rename = "Title")]
    title: &'a str,
    #[tabled(rename = "Links in")]
    incoming: usize,
    #[tabled(rename = "Links out")]
    outgoing: usize,
}

/// Print notes as a table, or `empty` when there are none.
pub fn print_notes_table(notes: &[&Note], empty: &str) {
    if notes.is_empty() {
        println!("{}", empty);
        return;
    }

    let rows: Vec<NoteRow<'_>> = notes
        .iter()
        .map(|n| NoteRow {
            path: &n.path,
            title: &n.title,
            incoming: n.incoming_links.len(),
            outgoing: n.outgoing_links.len(),
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));
}

pub fn print_notes_json(notes: &[&Note]) {
    let outputs: Vec<NoteOutput> = notes.iter().map(|n| NoteOutput::from(*n)).collect();
    print_json(&outputs);
}

/// Pretty-print any serialisable value, exiting on failure.
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            std::process::exit(1);
        }
    }
}
