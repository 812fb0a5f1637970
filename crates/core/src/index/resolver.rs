//! Reference resolution: raw `[[...]]` target text to a note.

use std::collections::HashMap;

use super::types::{Note, NoteId, normalize_path};
use crate::parser::{Block, Heading};

/// Lookup tables for every resolution tier, built once per note set.
///
/// Tiers, first match wins:
/// 1. companion document basename, then full document path (`.pdf` references only)
/// 2. note title
/// 3. path without extension
/// 4. filename without extension
///
/// Keys are lower-cased. Within a tier the last registered note wins.
#[derive(Debug, Clone, Default)]
pub struct LinkIndex {
    document_names: HashMap<String, NoteId>,
    document_paths: HashMap<String, NoteId>,
    titles: HashMap<String, NoteId>,
    paths: HashMap<String, NoteId>,
    filenames: HashMap<String, NoteId>,
}

impl LinkIndex {
    pub fn build(notes: &[Note]) -> Self {
        let mut index = Self::default();
        for note in notes {
            index.register(note);
        }
        index
    }

    fn register(&mut self, note: &Note) {
        if let Some(pdf) = &note.source_pdf {
            let path = normalize_path(pdf).to_lowercase();
            let name = path.rsplit('/').next().unwrap_or(&path).to_string();
            self.document_names.insert(name, note.id.clone());
            self.document_paths.insert(path, note.id.clone());
        }
        self.titles.insert(note.title.trim().to_lowercase(), note.id.clone());
        self.paths.insert(note.path_without_extension().to_lowercase(), note.id.clone());
        self.filenames.insert(note.file_stem().to_lowercase(), note.id.clone());
    }

    /// Resolve a raw reference to a note id.
    pub fn resolve_id(&self, raw: &str) -> Option<&NoteId> {
        let key = normalize_reference(raw);
        if key.is_empty() {
            return None;
        }

        if key.ends_with(".pdf")
            && let Some(id) = self
                .document_names
                .get(&key)
                .or_else(|| self.document_paths.get(&key))
        {
            return Some(id);
        }

        self.titles
            .get(&key)
            .or_else(|| self.paths.get(&key))
            .or_else(|| self.filenames.get(&key))
    }

    /// Resolve a raw reference against `notes`, which must be the set this index was built from.
    pub fn resolve<'n>(&self, raw: &str, notes: &'n [Note]) -> Option<&'n Note> {
        let id = self.resolve_id(raw)?;
        notes.iter().find(|n| &n.id == id)
    }
}

/// Resolve a raw reference to a note. Misses return `None`; there is no fuzzy fallback.
pub fn resolve_link<'n>(raw: &str, notes: &'n [Note]) -> Option<&'n Note> {
    LinkIndex::build(notes).resolve(raw, notes)
}

/// Normalise reference text for matching: anchor removed, trimmed, leading
/// `./` or `/` removed, trailing `.md` removed, lower-cased.
pub fn normalize_reference(raw: &str) -> String {
    let (target, _) = split_anchor(raw);
    let mut key = normalize_path(target).to_lowercase();
    if key.ends_with(".md") {
        key.truncate(key.len() - 3);
    }
    key.trim().to_string()
}

/// Split `Target#Heading`, `Target#^block` or `Target^block` into target and anchor text.
fn split_anchor(raw: &str) -> (&str, Option<&str>) {
    match raw.find(['#', '^']) {
        Some(pos) => (&raw[..pos], Some(&raw[pos..])),
        None => (raw, None),
    }
}

/// What a reference points at inside its target note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor<'n> {
    Note,
    Heading(&'n Heading),
    Block(&'n Block),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedAnchor<'n> {
    pub note: &'n Note,
    pub anchor: Anchor<'n>,
}

/// Resolve a reference including its heading or block anchor.
///
/// Returns `None` when the note is missing or the anchor names a heading or
/// block the note does not have. A bare `Target` resolves to [`Anchor::Note`].
pub fn resolve_anchor<'n>(raw: &str, notes: &'n [Note]) -> Option<ResolvedAnchor<'n>> {
    let note = resolve_link(raw, notes)?;
    let (_, anchor) = split_anchor(raw);

    let anchor = match anchor {
        None => Anchor::Note,
        Some(text) => {
            let text = text.trim_start_matches('#');
            if let Some(id) = text.strip_prefix('^') {
                let id = id.trim();
                Anchor::Block(note.blocks.iter().find(|b| b.id == id)?)
            } else {
                // Nested heading paths (`Note#Parent#Child`) match on the last segment.
                let wanted = text.rsplit('#').next().unwrap_or(text).trim().to_lowercase();
                if wanted.is_empty() {
                    Anchor::Note
                } else {
                    Anchor::Heading(
                        note.headings.iter().find(|h| h.text.to_lowercase() == wanted)?,
                    )
                }
            }
        }
    };

    Some(ResolvedAnchor { note, anchor })
}
