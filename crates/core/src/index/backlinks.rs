//! Backlink indexer: derives `incoming_links` for a whole note set.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tracing::debug;

use super::resolver::LinkIndex;
use super::types::{Note, NoteId};

/// Recompute every note's `incoming_links`. Returns a new vector; the input is untouched.
pub fn reindex(notes: &[Note]) -> Vec<Note> {
    reindex_with(notes, &LinkIndex::build(notes))
}

/// [`reindex`] with a prebuilt index for `notes`.
pub fn reindex_with(notes: &[Note], index: &LinkIndex) -> Vec<Note> {
    let mut incoming: HashMap<&NoteId, BTreeSet<NoteId>> = HashMap::new();

    for source in notes {
        for raw in &source.outgoing_links {
            match index.resolve_id(raw) {
                Some(target) if target != &source.id => {
                    incoming.entry(target).or_default().insert(source.id.clone());
                }
                Some(_) => {}
                None => debug!(source = %source.id, link = %raw, "unresolved link"),
            }
        }
    }

    notes
        .iter()
        .map(|note| Note {
            incoming_links: incoming.remove(&note.id).unwrap_or_default(),
            ..note.clone()
        })
        .collect()
}

/// Link totals over a note set, self-links counted as resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    pub total_links: usize,
    pub resolved: usize,
    pub unresolved: usize,
}

pub fn link_stats(notes: &[Note], index: &LinkIndex) -> LinkStats {
    let mut stats = LinkStats::default();
    for raw in notes.iter().flat_map(|n| &n.outgoing_links) {
        stats.total_links += 1;
        if index.resolve_id(raw).is_some() {
            stats.resolved += 1;
        } else {
            stats.unresolved += 1;
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_note;
    use crate::vault::FileStat;
    use chrono::Utc;

    fn note(path: &str, content: &str) -> Note {
        Note::from_parsed(&FileStat::new(path, Utc::now()), parse_note(content), None)
    }

    fn ids(note: &Note) -> Vec<&str> {
        note.incoming_links.iter().map(NoteId::as_str).collect()
    }

    #[test]
    fn test_basic_backlinks() {
        let notes = reindex(&[
            note("A.md", "# A\n\n[[B]] and [[B|again]]"),
            note("B.md", "# B\n\n[[A]]"),
            note("C.md", "# C\n\n[[B]] [[Nowhere]]"),
        ]);

        assert_eq!(ids(&notes[0]), vec!["B.md"]);
        assert_eq!(ids(&notes[1]), vec!["A.md", "C.md"]);
        assert!(notes[2].incoming_links.is_empty());
    }

    #[test]
    fn test_self_links_ignored() {
        let notes = reindex(&[note("Loop.md", "[[Loop]]")]);
        assert!(notes[0].incoming_links.is_empty());
    }

    #[test]
    fn test_stale_backlinks_replaced() {
        let mut notes = reindex(&[note("A.md", "[[B]]"), note("B.md", "")]);
        notes[0] = note("A.md", "nothing now");
        let notes = reindex(&notes);
        assert!(notes[1].incoming_links.is_empty());
    }

    #[test]
    fn test_pdf_link_reaches_companion() {
        let notes = reindex(&[
            note("Paper.md", "---\npdf: docs/paper.pdf\n---\n# Paper"),
            note("Reader.md", "see [[paper.pdf]]"),
        ]);
        assert_eq!(ids(&notes[0]), vec!["Reader.md"]);
    }

    #[test]
    fn test_link_stats() {
        let notes = vec![note("A.md", "[[B]] [[Ghost]] [[A]]"), note("B.md", "")];
        let stats = link_stats(&notes, &LinkIndex::build(&notes));
        assert_eq!(stats, LinkStats { total_links: 3, resolved: 2, unresolved: 1 });
    }
}
