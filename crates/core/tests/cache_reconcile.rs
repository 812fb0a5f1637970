use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use filetime::{FileTime, set_file_mtime};
use notegraph_core::cache::DiskCache;
use notegraph_core::index::{Note, NoteId};
use notegraph_core::vault::{FileChange, FileStat, FsVault, VaultError, VaultSource};
use notegraph_core::GraphEngine;
use tempfile::TempDir;

/// Filesystem source that records every path it reads and can fail chosen paths.
#[derive(Clone)]
struct SpyVault {
    inner: FsVault,
    reads: Arc<Mutex<Vec<String>>>,
    failing: Vec<String>,
}

impl SpyVault {
    fn new(root: &Path) -> Self {
        Self { inner: FsVault::open(root).unwrap(), reads: Arc::default(), failing: Vec::new() }
    }

    fn failing(mut self, path: &str) -> Self {
        self.failing.push(path.to_string());
        self
    }

    fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }
}

impl VaultSource for SpyVault {
    fn root(&self) -> &Path {
        self.inner.root()
    }

    fn includes(&self, path: &str) -> bool {
        self.inner.includes(path)
    }

    async fn list_files(&self) -> Result<Vec<FileStat>, VaultError> {
        self.inner.list_files().await
    }

    async fn stat(&self, path: &str) -> Result<FileStat, VaultError> {
        self.inner.stat(path).await
    }

    async fn read_batch(&self, paths: &[String]) -> BTreeMap<String, Option<String>> {
        self.reads.lock().unwrap().extend(paths.iter().cloned());
        let mut contents = self.inner.read_batch(paths).await;
        for path in &self.failing {
            if let Some(slot) = contents.get_mut(path) {
                *slot = None;
            }
        }
        contents
    }

    async fn read_file(&self, path: &str) -> Result<String, VaultError> {
        self.reads.lock().unwrap().push(path.to_string());
        self.inner.read_file(path).await
    }
}

fn vault() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("A.md"), "# A\n[[B]] #topic").unwrap();
    fs::write(dir.path().join("B.md"), "# B\n- [ ] write tests").unwrap();
    for (i, name) in ["A.md", "B.md"].iter().enumerate() {
        set_file_mtime(dir.path().join(name), FileTime::from_unix_time(1_700_000_000 + i as i64, 0))
            .unwrap();
    }
    dir
}

fn without_content(notes: &[Note]) -> Vec<Note> {
    notes.iter().map(|n| Note { content: None, ..n.clone() }).collect()
}

#[tokio::test]
async fn warm_open_reads_nothing_and_matches_cold_open() {
    let dir = vault();
    let cache_dir = TempDir::new().unwrap();
    let cache = DiskCache::new(cache_dir.path());

    let cold_source = SpyVault::new(dir.path());
    let mut cold = GraphEngine::open(cold_source.clone(), Some(cache.clone())).await.unwrap();
    cold.flush().await;
    assert_eq!(cold_source.reads(), vec!["A.md", "B.md"]);
    assert!(cache.cache_path(cold.root()).exists());

    let warm_source = SpyVault::new(dir.path());
    let warm = GraphEngine::open(warm_source.clone(), Some(cache.clone())).await.unwrap();
    assert!(warm_source.reads().is_empty());
    assert_eq!(warm.stats().cache_hits, 2);
    assert_eq!(warm.stats().parsed, 0);
    assert_eq!(warm.cache_entries(), cold.cache_entries());
    assert_eq!(warm.notes(), without_content(cold.notes()).as_slice());
}

#[tokio::test]
async fn changed_mtime_forces_reparse() {
    let dir = vault();
    let cache_dir = TempDir::new().unwrap();
    let cache = DiskCache::new(cache_dir.path());

    let mut first = GraphEngine::open(SpyVault::new(dir.path()), Some(cache.clone())).await.unwrap();
    first.flush().await;

    let b = dir.path().join("B.md");
    fs::write(&b, "# B\n[[A]]").unwrap();
    set_file_mtime(&b, FileTime::from_unix_time(2_000_000_000, 0)).unwrap();

    let source = SpyVault::new(dir.path());
    let second = GraphEngine::open(source.clone(), Some(cache)).await.unwrap();
    assert_eq!(source.reads(), vec!["B.md"]);
    assert_eq!(second.stats().cache_hits, 1);
    assert_eq!(second.stats().parsed, 1);
    assert_eq!(second.cache_entries()["B.md"].mtime, 2_000_000_000_000);

    let a = second.note_by_path("A.md").unwrap();
    assert_eq!(a.incoming_links.iter().map(NoteId::as_str).collect::<Vec<_>>(), vec!["B.md"]);
}

#[tokio::test]
async fn unreadable_note_is_kept_without_entry() {
    let dir = vault();
    let source = SpyVault::new(dir.path()).failing("B.md");
    let engine = GraphEngine::open(source, None).await.unwrap();

    let b = engine.note_by_path("B.md").unwrap();
    assert_eq!(b.title, "B");
    assert!(b.content.is_none());
    assert!(b.outgoing_links.is_empty());
    assert_eq!(engine.stats().read_failures, 1);
    assert!(!engine.cache_entries().contains_key("B.md"));

    // A's link still reaches B through its filename.
    assert_eq!(b.incoming_links.len(), 1);
}

#[tokio::test]
async fn corrupt_cache_falls_back_to_full_parse() {
    let dir = vault();
    let cache_dir = TempDir::new().unwrap();
    let cache = DiskCache::new(cache_dir.path());
    let root = FsVault::open(dir.path()).unwrap().root().to_path_buf();
    fs::write(cache.cache_path(&root), "{\"version\": 1, \"entries\": ").unwrap();

    let mut engine = GraphEngine::open(SpyVault::new(dir.path()), Some(cache.clone())).await.unwrap();
    assert_eq!(engine.stats().parsed, 2);

    engine.flush().await;
    assert_eq!(cache.load(&root).map(|entries| entries.len()), Some(2));
}

#[tokio::test]
async fn mutations_are_persisted_on_flush() {
    let dir = vault();
    let cache_dir = TempDir::new().unwrap();
    let cache = DiskCache::new(cache_dir.path());

    let mut engine = GraphEngine::open(SpyVault::new(dir.path()), Some(cache.clone())).await.unwrap();
    fs::write(dir.path().join("C.md"), "# C\n[[A]]").unwrap();
    engine.apply_change(FileChange::Created("C.md".into())).await.unwrap();
    engine.flush().await;

    let source = SpyVault::new(dir.path());
    let reopened = GraphEngine::open(source.clone(), Some(cache)).await.unwrap();
    assert!(source.reads().is_empty());
    assert_eq!(reopened.notes().len(), 3);
}

#[tokio::test]
async fn content_loads_lazily_after_warm_open() {
    let dir = vault();
    let cache_dir = TempDir::new().unwrap();
    let cache = DiskCache::new(cache_dir.path());

    GraphEngine::open(SpyVault::new(dir.path()), Some(cache.clone())).await.unwrap().flush().await;

    let source = SpyVault::new(dir.path());
    let mut engine = GraphEngine::open(source.clone(), Some(cache)).await.unwrap();
    let id = NoteId::from_path("A.md");
    assert!(engine.note(&id).unwrap().content.is_none());

    let content = engine.load_content(&id).await.unwrap();
    assert_eq!(content, "# A\n[[B]] #topic");
    assert_eq!(engine.note(&id).unwrap().content.as_deref(), Some(content.as_str()));

    engine.load_content(&id).await.unwrap();
    assert_eq!(source.reads(), vec!["A.md"]);
}
