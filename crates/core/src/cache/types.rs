use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::index::{Note, NoteId};
use crate::parser::{Block, Callout, Heading, TaskStats};
use crate::vault::FileStat;

/// Bumped whenever the entry layout or parser output changes.
pub const CACHE_VERSION: u32 = 2;

/// Cache entries keyed by vault-relative path.
pub type CacheMap = BTreeMap<String, CacheEntry>;

/// Everything derived from one note file, minus its content and backlinks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub version: u32,
    /// File mtime in milliseconds since the Unix epoch when this entry was built.
    pub mtime: i64,
    pub title: String,
    pub links: Vec<String>,
    pub tags: Vec<String>,
    #[serde(default)]
    pub headings: Vec<Heading>,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub task_stats: TaskStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub frontmatter: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_pdf: Option<String>,
    #[serde(default)]
    pub external_links: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_callout: Option<Callout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub modified_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn from_note(note: &Note, mtime: i64) -> Self {
        Self {
            version: CACHE_VERSION,
            mtime,
            title: note.title.clone(),
            links: note.outgoing_links.clone(),
            tags: note.tags.clone(),
            headings: note.headings.clone(),
            blocks: note.blocks.clone(),
            task_stats: note.task_stats,
            color: note.color.clone(),
            frontmatter: note.frontmatter.clone(),
            source_pdf: note.source_pdf.clone(),
            external_links: note.external_links.clone(),
            first_image: note.first_image.clone(),
            card_callout: note.card_callout.clone(),
            created_at: note.created_at,
            modified_at: note.modified_at,
        }
    }

    /// Rebuild the note at `path`. Content stays unloaded and backlinks empty.
    pub fn into_note(self, path: &str) -> Note {
        let id = NoteId::from_path(path);
        Note {
            path: id.as_str().to_string(),
            id,
            title: self.title,
            content: None,
            outgoing_links: self.links,
            incoming_links: BTreeSet::new(),
            tags: self.tags,
            headings: self.headings,
            blocks: self.blocks,
            source_pdf: self.source_pdf,
            task_stats: self.task_stats,
            color: self.color,
            frontmatter: self.frontmatter,
            external_links: self.external_links,
            first_image: self.first_image,
            card_callout: self.card_callout,
            created_at: self.created_at,
            modified_at: self.modified_at,
        }
    }

    /// Valid iff built by this cache version from a file with the same mtime.
    pub fn is_valid_for(&self, stat: &FileStat) -> bool {
        self.version == CACHE_VERSION && self.mtime == stat.mtime
    }
}

/// On-disk cache document for one vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheFile {
    pub version: u32,
    pub vault_path: String,
    pub entries: CacheMap,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_note;

    #[test]
    fn test_entry_round_trips_note_metadata() {
        let stat = FileStat::new("dir/A.md", DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap());
        let note = Note::from_parsed(
            &stat,
            parse_note("---\ncolor: red\n---\n# A\n\n[[B]] #tag\n- [ ] todo ^blk"),
            Some("ignored".into()),
        );

        let entry = CacheEntry::from_note(&note, stat.mtime);
        assert!(entry.is_valid_for(&stat));

        let restored = entry.into_note("dir/A.md");
        assert_eq!(restored.color.as_deref(), Some("red"));
        assert_eq!(restored, Note { content: None, ..note });
    }

    #[test]
    fn test_entry_invalid_on_mtime_or_version_change() {
        let stat = FileStat::new("A.md", Utc::now());
        let note = Note::unreadable(&stat);
        let entry = CacheEntry::from_note(&note, stat.mtime);

        let touched = FileStat { mtime: stat.mtime + 1, ..stat.clone() };
        assert!(!entry.is_valid_for(&touched));

        let old = CacheEntry { version: CACHE_VERSION + 1, ..entry };
        assert!(!old.is_valid_for(&stat));
    }
}
