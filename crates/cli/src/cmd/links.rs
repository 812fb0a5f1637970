//! Links command implementation.

use std::path::Path;

use notegraph_core::vault::FsVault;
use notegraph_core::{GraphEngine, Note};
use serde::Serialize;

use super::output::{NoteOutput, print_json, print_notes_table};
use super::{load_config, with_engine};
use crate::LinksArgs;

#[derive(Serialize)]
struct LinksOutput<'a> {
    note: NoteOutput,
    #[serde(skip_serializing_if = "Option::is_none")]
    backlinks: Option<Vec<NoteOutput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outlinks: Option<Vec<NoteOutput>>,
    unresolved: Vec<&'a str>,
}

pub fn run(config: Option<&Path>, profile: Option<&str>, args: LinksArgs) {
    let rc = load_config(config, profile);

    // Exit only after the engine has flushed the cache.
    let found = with_engine(&rc, true, |engine| {
        let Some(note) = find_note(engine, &args.note) else {
            eprintln!("Note not found: {}", args.note);
            eprintln!("Hint: pass a vault-relative path or a link reference.");
            return false;
        };

        // Both shown by default
        let show_backlinks = args.backlinks || !args.outlinks;
        let show_outlinks = args.outlinks || !args.backlinks;

        let backlinks = engine.backlinks(&note.id);
        let outlinks = engine.outgoing(&note.id);
        let unresolved = engine.unresolved(&note.id);

        if args.json {
            let outputs = |notes: &[&Note]| -> Vec<NoteOutput> {
                notes.iter().map(|n| NoteOutput::from(*n)).collect()
            };
            print_json(&LinksOutput {
                note: NoteOutput::from(note),
                backlinks: show_backlinks.then(|| outputs(&backlinks)),
                outlinks: show_outlinks.then(|| outputs(&outlinks)),
                unresolved,
            });
            return true;
        }

        if show_backlinks {
            println!("=== Backlinks (notes linking to {}) ===", note.path);
            print_notes_table(&backlinks, "(no backlinks)");
        }
        if show_backlinks && show_outlinks {
            println!();
        }
        if show_outlinks {
            println!("=== Outgoing links (notes {} links to) ===", note.path);
            print_notes_table(&outlinks, "(no outgoing links)");
            if !unresolved.is_empty() {
                println!("Unresolved: {}", unresolved.join(", "));
            }
        }
        true
    });
    if !found {
        std::process::exit(1);
    }
}

/// Look a note up by path (with or without `.md`), then as a link reference.
fn find_note<'e>(engine: &'e GraphEngine<FsVault>, query: &str) -> Option<&'e Note> {
    engine
        .note_by_path(query)
        .or_else(|| engine.note_by_path(&format!("{query}.md")))
        .or_else(|| engine.resolve(query))
}
