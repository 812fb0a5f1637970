//! Note data model shared by the resolver, indexer, cache and engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use crate::parser::{Block, Callout, Heading, ParsedNote, TaskStats, note_title};
use crate::vault::FileStat;

/// Stable note identifier: the normalised vault-relative path.
///
/// Using the path itself (rather than a hash of it) rules out id collisions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn from_path(path: &str) -> Self {
        Self(normalize_path(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalise a vault-relative path: forward slashes, no leading `./` or `/`.
pub fn normalize_path(path: &str) -> String {
    let path = path.trim().replace('\\', "/");
    let mut rest = path.as_str();
    loop {
        if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('/') {
            rest = stripped;
        } else {
            break;
        }
    }
    rest.to_string()
}

/// A note in the vault graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    pub id: NoteId,
    /// Path relative to vault root.
    pub path: String,
    /// First level-1 heading, or the filename without extension.
    pub title: String,
    /// Raw file content; `None` until loaded when restored from cache.
    #[serde(skip)]
    pub content: Option<String>,
    /// Raw link targets found in content.
    pub outgoing_links: Vec<String>,
    /// Notes whose outgoing links resolve to this note. Derived by `reindex`.
    pub incoming_links: BTreeSet<NoteId>,
    pub tags: Vec<String>,
    pub headings: Vec<Heading>,
    pub blocks: Vec<Block>,
    /// Companion document this note stands in for.
    pub source_pdf: Option<String>,
    pub task_stats: TaskStats,
    /// Display colour: a palette name, a `1`-`6` preset or any other string.
    pub color: Option<String>,
    pub frontmatter: BTreeMap<String, serde_json::Value>,
    pub external_links: Vec<String>,
    pub first_image: Option<String>,
    pub card_callout: Option<Callout>,
    pub created_at: Option<DateTime<Utc>>,
    pub modified_at: DateTime<Utc>,
}

impl Note {
    /// Build a note from freshly parsed content.
    pub fn from_parsed(stat: &FileStat, parsed: ParsedNote, content: Option<String>) -> Self {
        let id = NoteId::from_path(&stat.path);
        let task_stats = parsed.task_stats();
        Self {
            path: id.as_str().to_string(),
            title: note_title(&parsed.headings, id.as_str()),
            id,
            content,
            outgoing_links: parsed.links,
            incoming_links: BTreeSet::new(),
            tags: parsed.tags,
            headings: parsed.headings,
            blocks: parsed.blocks,
            source_pdf: parsed.source_pdf,
            task_stats,
            color: parsed.color,
            frontmatter: parsed.frontmatter.map(|fm| fm.to_json()).unwrap_or_default(),
            external_links: parsed.external_links,
            first_image: parsed.first_image,
            card_callout: parsed.card_callout,
            created_at: stat.created,
            modified_at: stat.modified,
        }
    }

    /// A note whose content could not be read: it exists in the graph with
    /// filename-only metadata.
    pub fn unreadable(stat: &FileStat) -> Self {
        Self::from_parsed(stat, ParsedNote::default(), None)
    }

    /// The same note at a new path. Title is re-derived in case it came from the filename.
    pub fn moved_to(&self, path: &str) -> Self {
        let id = NoteId::from_path(path);
        Self {
            path: id.as_str().to_string(),
            title: note_title(&self.headings, id.as_str()),
            id,
            ..self.clone()
        }
    }

    /// Filename without directory or extension.
    pub fn file_stem(&self) -> &str {
        Path::new(&self.path).file_stem().and_then(|s| s.to_str()).unwrap_or(&self.path)
    }

    /// Path without its extension, e.g. `folder/note`.
    pub fn path_without_extension(&self) -> &str {
        match self.path.rsplit_once('.') {
            Some((stem, ext)) if !ext.contains('/') => stem,
            _ => &self.path,
        }
    }

    /// Parent folder, `None` for notes at the vault root.
    pub fn folder(&self) -> Option<&str> {
        self.path.rsplit_once('/').map(|(folder, _)| folder)
    }
}
