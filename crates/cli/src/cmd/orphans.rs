//! Orphans command implementation.

use std::path::Path;

use notegraph_core::Note;

use super::output::{print_notes_json, print_notes_table};
use super::{load_config, with_engine};
use crate::OrphansArgs;

pub fn run(config: Option<&Path>, profile: Option<&str>, args: OrphansArgs) {
    let rc = load_config(config, profile);

    with_engine(&rc, true, |engine| {
        // No backlinks and no link that resolves to another note
        let orphans: Vec<&Note> = engine
            .notes()
            .iter()
            .filter(|n| n.incoming_links.is_empty() && engine.outgoing(&n.id).is_empty())
            .collect();

        if args.json {
            print_notes_json(&orphans);
        } else {
            print_notes_table(&orphans, "(no orphan notes)");
        }
    });
}
