//! Per-vault graph state: notes, link index, cache entries and pending saves.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, CacheMap, DiskCache, ReconcileStats, reconcile};
use crate::graph::{GraphOptions, GraphSnapshot};
use crate::index::{LinkIndex, LinkStats, Note, NoteId, link_stats, reindex_with};
use crate::layout::{LayoutAlgorithm, LayoutOptions, Position, compute_layout};
use crate::parser::parse_note;
use crate::vault::{FileChange, FileStat, VaultError, VaultSource};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error("note not found: {0}")]
    NoteNotFound(String),

    #[error("a note already exists at {0}")]
    PathTaken(String),
}

/// The note graph of one vault.
///
/// Every mutation replaces the note collection and recomputes backlinks, so
/// `incoming_links` is always consistent with the current notes. Cache saves
/// run in the background and are chained so they land in order.
pub struct GraphEngine<S: VaultSource> {
    source: S,
    cache: Option<DiskCache>,
    notes: Arc<Vec<Note>>,
    index: LinkIndex,
    positions: HashMap<NoteId, usize>,
    entries: CacheMap,
    /// Entries changed since the last save was scheduled.
    dirty: bool,
    pending_save: Option<JoinHandle<()>>,
    stats: ReconcileStats,
}

impl<S: VaultSource> GraphEngine<S> {
    /// Reconcile the vault against the cache and build the graph.
    pub async fn open(source: S, cache: Option<DiskCache>) -> Result<Self, EngineError> {
        let cached = match &cache {
            Some(cache) => cache.load_in_background(source.root().to_path_buf()).await,
            None => None,
        };
        let cached_len = cached.as_ref().map(CacheMap::len);
        let reconciled = reconcile(&source, cached).await?;

        let mut engine = Self {
            source,
            cache,
            notes: Arc::default(),
            index: LinkIndex::default(),
            positions: HashMap::new(),
            entries: reconciled.entries,
            dirty: false,
            pending_save: None,
            stats: reconciled.stats,
        };
        engine.commit(reconciled.notes);

        if engine.stats.parsed > 0 || cached_len != Some(engine.entries.len()) {
            engine.mark_dirty();
        }
        info!("Opened vault {} with {} notes", engine.root().display(), engine.notes.len());
        Ok(engine)
    }

    pub fn root(&self) -> &Path {
        self.source.root()
    }

    /// Counters from the reconciliation done by [`GraphEngine::open`].
    pub fn stats(&self) -> ReconcileStats {
        self.stats
    }

    /// Current notes, sorted by path.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn cache_entries(&self) -> &CacheMap {
        &self.entries
    }

    pub fn note(&self, id: &NoteId) -> Option<&Note> {
        self.positions.get(id).map(|&i| &self.notes[i])
    }

    pub fn note_by_path(&self, path: &str) -> Option<&Note> {
        self.note(&NoteId::from_path(path))
    }

    pub fn resolve(&self, raw: &str) -> Option<&Note> {
        self.index.resolve_id(raw).and_then(|id| self.note(id))
    }

    /// Notes linking to `id`, in id order.
    pub fn backlinks(&self, id: &NoteId) -> Vec<&Note> {
        self.note(id)
            .map(|note| note.incoming_links.iter().filter_map(|s| self.note(s)).collect())
            .unwrap_or_default()
    }

    /// Distinct notes `id` links to, in link order. Self-links are skipped.
    pub fn outgoing(&self, id: &NoteId) -> Vec<&Note> {
        let Some(note) = self.note(id) else {
            return Vec::new();
        };
        let mut targets: Vec<&Note> = Vec::new();
        for raw in &note.outgoing_links {
            if let Some(target) = self.resolve(raw)
                && target.id != note.id
                && !targets.iter().any(|t| t.id == target.id)
            {
                targets.push(target);
            }
        }
        targets
    }

    /// Raw link targets of `id` that resolve to no note.
    pub fn unresolved(&self, id: &NoteId) -> Vec<&str> {
        self.note(id)
            .map(|note| {
                note.outgoing_links
                    .iter()
                    .filter(|raw| self.index.resolve_id(raw).is_none())
                    .map(String::as_str)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn link_stats(&self) -> LinkStats {
        link_stats(&self.notes, &self.index)
    }

    pub fn graph(&self, options: GraphOptions) -> GraphSnapshot {
        GraphSnapshot::build(&self.notes, options)
    }

    /// Lay out the graph, sizing every node at the configured minimum.
    pub fn layout(
        &self,
        algorithm: LayoutAlgorithm,
        graph: GraphOptions,
        options: &LayoutOptions,
    ) -> BTreeMap<String, Position> {
        let (nodes, edges) = self.graph(graph).layout_input(options.min_width, options.min_height);
        compute_layout(algorithm, &nodes, &edges, options)
    }

    /// Insert or replace the note at `stat.path` with freshly parsed `content`.
    pub fn upsert_note(&mut self, stat: &FileStat, content: String) -> NoteId {
        let note = Note::from_parsed(stat, parse_note(&content), Some(content));
        let id = note.id.clone();
        self.entries.insert(id.to_string(), CacheEntry::from_note(&note, stat.mtime));
        self.replace(note, None);
        self.mark_dirty();
        id
    }

    pub fn remove_note(&mut self, path: &str) -> Result<(), EngineError> {
        let id = NoteId::from_path(path);
        if !self.positions.contains_key(&id) {
            return Err(EngineError::NoteNotFound(id.to_string()));
        }
        let notes = self.notes.iter().filter(|n| n.id != id).cloned().collect();
        self.entries.remove(id.as_str());
        self.commit(notes);
        self.mark_dirty();
        debug!("Removed note {}", id);
        Ok(())
    }

    /// Move a note to a new path, keeping its parsed content.
    pub fn rename_note(&mut self, from: &str, to: &str) -> Result<(), EngineError> {
        let from_id = NoteId::from_path(from);
        let to_id = NoteId::from_path(to);
        let note = self.note(&from_id).ok_or_else(|| EngineError::NoteNotFound(from_id.to_string()))?;
        if from_id == to_id {
            return Ok(());
        }
        if self.positions.contains_key(&to_id) {
            return Err(EngineError::PathTaken(to_id.to_string()));
        }

        let moved = note.moved_to(to_id.as_str());
        if let Some(entry) = self.entries.remove(from_id.as_str()) {
            self.entries.insert(to_id.to_string(), CacheEntry::from_note(&moved, entry.mtime));
        }
        self.replace(moved, Some(&from_id));
        self.mark_dirty();
        debug!("Renamed note {} -> {}", from_id, to_id);
        Ok(())
    }

    /// Apply a file watcher event, reading changed files through the source.
    ///
    /// Events for paths the source does not list (non-notes, hidden or excluded
    /// folders) are ignored, and a rename into such a path removes the note. A
    /// note that cannot be read is kept with filename-only metadata and no cache entry.
    pub async fn apply_change(&mut self, change: FileChange) -> Result<(), EngineError> {
        match change {
            FileChange::Created(path) | FileChange::Modified(path) => {
                if self.source.includes(&path) {
                    self.refresh(&path).await?;
                } else {
                    debug!("Ignoring change to {}", path);
                }
            }
            FileChange::Removed(path) => {
                if self.source.includes(&path) {
                    match self.remove_note(&path) {
                        Err(EngineError::NoteNotFound(_)) => debug!("Removed unknown note {}", path),
                        other => other?,
                    }
                }
            }
            FileChange::Renamed { from, to } => match (self.source.includes(&from), self.source.includes(&to)) {
                (true, true) if self.note_by_path(&from).is_some() => {
                    if self.note_by_path(&to).is_some() {
                        self.remove_note(&to)?;
                    }
                    self.rename_note(&from, &to)?;
                }
                (true, false) => {
                    if self.note_by_path(&from).is_some() {
                        self.remove_note(&from)?;
                    }
                }
                (_, true) => self.refresh(&to).await?,
                (false, false) => {}
            },
        }
        Ok(())
    }

    async fn refresh(&mut self, path: &str) -> Result<(), EngineError> {
        let stat = self.source.stat(path).await?;
        match self.source.read_file(&stat.path).await {
            Ok(content) => {
                self.upsert_note(&stat, content);
            }
            Err(e) => {
                warn!("Keeping unreadable note {}: {}", stat.path, e);
                self.entries.remove(&stat.path);
                self.replace(Note::unreadable(&stat), None);
                self.mark_dirty();
            }
        }
        Ok(())
    }

    /// Content of a note, read from the source on first use.
    pub async fn load_content(&mut self, id: &NoteId) -> Result<String, EngineError> {
        let &i = self.positions.get(id).ok_or_else(|| EngineError::NoteNotFound(id.to_string()))?;
        if let Some(content) = &self.notes[i].content {
            return Ok(content.clone());
        }
        let content = self.source.read_file(id.as_str()).await?;
        Arc::make_mut(&mut self.notes)[i].content = Some(content.clone());
        Ok(content)
    }

    /// Wait for background saves and persist anything not yet saved.
    pub async fn flush(&mut self) {
        if self.dirty {
            self.schedule_save();
        }
        if let Some(pending) = self.pending_save.take()
            && let Err(e) = pending.await
        {
            warn!("Cache save task failed: {}", e);
        }
    }

    /// Put `note` in place of `replacing` (or of the note at its own path) and recommit.
    fn replace(&mut self, note: Note, replacing: Option<&NoteId>) {
        let drop_id = replacing.unwrap_or(&note.id).clone();
        let mut notes: Vec<Note> = self
            .notes
            .iter()
            .filter(|n| n.id != drop_id && n.id != note.id)
            .cloned()
            .collect();
        let at = notes.partition_point(|n| n.path < note.path);
        notes.insert(at, note);
        self.commit(notes);
    }

    fn commit(&mut self, notes: Vec<Note>) {
        self.index = LinkIndex::build(&notes);
        let notes = reindex_with(&notes, &self.index);
        self.positions = notes.iter().enumerate().map(|(i, n)| (n.id.clone(), i)).collect();
        self.notes = Arc::new(notes);
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.schedule_save();
    }

    /// Start a background save when a cache and a Tokio runtime are available.
    /// Otherwise the engine stays dirty until [`GraphEngine::flush`].
    fn schedule_save(&mut self) {
        let Some(cache) = &self.cache else {
            self.dirty = false;
            return;
        };
        if tokio::runtime::Handle::try_current().is_err() {
            return;
        }
        let handle = cache.save_in_background(
            self.source.root().to_path_buf(),
            self.entries.clone(),
            self.pending_save.take(),
        );
        self.pending_save = Some(handle);
        self.dirty = false;
    }
}
