//! Rebuild the note set from the vault, reusing valid cache entries.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use super::types::{CacheEntry, CacheMap};
use crate::index::Note;
use crate::parser::parse_note;
use crate::vault::{FileStat, VaultError, VaultSource};

/// Counters from one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    /// Note files listed by the source.
    pub files_found: usize,
    /// Notes rebuilt from cache without reading the file.
    pub cache_hits: usize,
    /// Notes read and parsed.
    pub parsed: usize,
    /// Stale or new notes whose content could not be read.
    pub read_failures: usize,
    pub duration_ms: u64,
}

/// Result of [`reconcile`]: notes sorted by path (backlinks not yet computed)
/// and the cache entries to persist.
#[derive(Debug, Clone)]
pub struct Reconciled {
    pub notes: Vec<Note>,
    pub entries: CacheMap,
    pub stats: ReconcileStats,
}

/// Enumerate the vault and produce a note for every file.
///
/// Files whose cache entry is still valid are rebuilt from it without being
/// read. All other files are read in one batch and parsed. A file that cannot
/// be read still yields a note (filename-only metadata, no content) but gets
/// no cache entry, so it is retried next time.
pub async fn reconcile<S: VaultSource>(
    source: &S,
    cached: Option<CacheMap>,
) -> Result<Reconciled, VaultError> {
    let start = Instant::now();
    let files = source.list_files().await?;
    let mut cached = cached.unwrap_or_default();

    let mut stats = ReconcileStats { files_found: files.len(), ..Default::default() };
    let mut notes = Vec::with_capacity(files.len());
    let mut entries = CacheMap::new();
    let mut stale: Vec<&FileStat> = Vec::new();

    // Phase 1: partition into cache hits and files to parse
    for stat in &files {
        match cached.remove(&stat.path) {
            Some(entry) if entry.is_valid_for(stat) => {
                notes.push(entry.clone().into_note(&stat.path));
                entries.insert(stat.path.clone(), entry);
                stats.cache_hits += 1;
            }
            _ => stale.push(stat),
        }
    }
    if !cached.is_empty() {
        debug!("Dropping {} cache entries for files no longer in the vault", cached.len());
    }

    // Phase 2: read and parse everything else
    if !stale.is_empty() {
        let paths: Vec<String> = stale.iter().map(|s| s.path.clone()).collect();
        let mut contents = source.read_batch(&paths).await;

        for stat in stale {
            match contents.remove(&stat.path).flatten() {
                Some(content) => {
                    let note = Note::from_parsed(stat, parse_note(&content), Some(content));
                    entries.insert(stat.path.clone(), CacheEntry::from_note(&note, stat.mtime));
                    notes.push(note);
                    stats.parsed += 1;
                }
                None => {
                    notes.push(Note::unreadable(stat));
                    stats.read_failures += 1;
                }
            }
        }
    }

    notes.sort_by(|a, b| a.path.cmp(&b.path));
    stats.duration_ms = start.elapsed().as_millis() as u64;

    info!(
        "Reconciled {} files: {} from cache, {} parsed, {} unreadable ({} ms)",
        stats.files_found, stats.cache_hits, stats.parsed, stats.read_failures, stats.duration_ms
    );
    Ok(Reconciled { notes, entries, stats })
}
