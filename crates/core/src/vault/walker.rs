//! Note file discovery under a vault root.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

use crate::index::normalize_path;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("vault root does not exist: {0}")]
    MissingRoot(String),

    #[error("failed to walk vault directory {0}: {1}")]
    WalkError(String, #[source] walkdir::Error),

    #[error("failed to read file metadata {0}: {1}")]
    MetadataError(String, #[source] std::io::Error),

    #[error("failed to read file {path}: {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("background vault task failed: {0}")]
    TaskFailed(String),
}

/// Tool and build directories that never hold notes.
const IGNORED_DIRS: &[&str] = &["node_modules", "target", "__pycache__", "venv"];

/// A note file found by [`VaultWalker::walk`].
#[derive(Debug, Clone)]
pub struct WalkedFile {
    /// Vault-relative path with forward slashes.
    pub path: String,
    pub modified: SystemTime,
    /// Not every platform records a creation time.
    pub created: Option<SystemTime>,
}

/// Finds note files below a canonicalised root.
#[derive(Debug, Clone)]
pub struct VaultWalker {
    root: PathBuf,
    excluded: Vec<PathBuf>,
}

impl VaultWalker {
    pub fn new(root: &Path) -> Result<Self, VaultError> {
        Self::with_exclusions(root, Vec::new())
    }

    /// Folders in `excluded` may be vault-relative (`archive/2023`) or absolute paths
    /// inside the vault.
    pub fn with_exclusions(root: &Path, excluded: Vec<PathBuf>) -> Result<Self, VaultError> {
        let root = root
            .canonicalize()
            .map_err(|_| VaultError::MissingRoot(root.display().to_string()))?;

        let excluded = excluded
            .into_iter()
            .map(|folder| {
                if !folder.is_absolute() {
                    return folder;
                }
                let folder = folder.canonicalize().unwrap_or(folder);
                match folder.strip_prefix(&root) {
                    Ok(relative) => relative.to_path_buf(),
                    Err(_) => folder,
                }
            })
            .collect();

        Ok(Self { root, excluded })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every note file, sorted by path. Hidden entries (the cache directory included),
    /// tool directories and excluded folders are skipped.
    pub fn walk(&self) -> Result<Vec<WalkedFile>, VaultError> {
        let walk_error = |e| VaultError::WalkError(self.root.display().to_string(), e);
        let mut files = Vec::new();

        let entries = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.skips(e));

        for entry in entries {
            let entry = entry.map_err(walk_error)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(path) = self.relative(entry.path()) else {
                continue;
            };
            if !is_note_path(&path) {
                continue;
            }

            let metadata = entry.metadata().map_err(walk_error)?;
            files.push(WalkedFile {
                path,
                modified: metadata.modified().unwrap_or(UNIX_EPOCH),
                created: metadata.created().ok(),
            });
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    /// Whether `walk` would list the vault-relative `path`, judged on the path alone.
    pub fn includes(&self, path: &str) -> bool {
        let path = normalize_path(path);
        is_note_path(&path)
            && !path.split('/').any(skipped_name)
            && !self.is_excluded(Path::new(&path))
    }

    fn skips(&self, entry: &DirEntry) -> bool {
        skipped_name(&entry.file_name().to_string_lossy())
            || entry.path().strip_prefix(&self.root).is_ok_and(|relative| self.is_excluded(relative))
    }

    fn is_excluded(&self, relative: &Path) -> bool {
        self.excluded.iter().any(|folder| relative.starts_with(folder))
    }

    fn relative(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        Some(normalize_path(&relative.to_string_lossy()))
    }
}

fn skipped_name(name: &str) -> bool {
    name.starts_with('.') || IGNORED_DIRS.contains(&name)
}

/// Whether a vault-relative path names a note file (`.md` / `.markdown`).
pub fn is_note_path(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md") || e.eq_ignore_ascii_case("markdown"))
}
