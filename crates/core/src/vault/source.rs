//! The file-access contract consumed by the engine, and its filesystem implementation.

use std::collections::BTreeMap;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use tokio::task::JoinSet;

use super::walker::{VaultError, VaultWalker, WalkedFile};
use crate::index::normalize_path;

/// Stat information for one note file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    /// Vault-relative path with forward slashes.
    pub path: String,
    /// Modification time in milliseconds since the Unix epoch; the cache key.
    pub mtime: i64,
    pub created: Option<DateTime<Utc>>,
    pub modified: DateTime<Utc>,
}

impl FileStat {
    pub fn new(path: &str, modified: DateTime<Utc>) -> Self {
        Self {
            path: normalize_path(path),
            mtime: modified.timestamp_millis(),
            created: None,
            modified,
        }
    }

    fn from_times(path: &str, modified: SystemTime, created: Option<SystemTime>) -> Self {
        Self { created: created.map(DateTime::<Utc>::from), ..Self::new(path, modified.into()) }
    }

    fn from_metadata(path: &str, metadata: &Metadata) -> Self {
        Self::from_times(
            path,
            metadata.modified().unwrap_or(std::time::UNIX_EPOCH),
            metadata.created().ok(),
        )
    }
}

impl From<&WalkedFile> for FileStat {
    fn from(file: &WalkedFile) -> Self {
        Self::from_times(&file.path, file.modified, file.created)
    }
}

/// A change to the vault observed by a file watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Created(String),
    Modified(String),
    Removed(String),
    Renamed { from: String, to: String },
}

/// Async access to note files. Paths are vault-relative.
///
/// Batch reads never fail as a whole: a path that cannot be read maps to `None`.
#[allow(async_fn_in_trait)]
pub trait VaultSource {
    /// Vault root, used as the vault identity for the cache.
    fn root(&self) -> &Path;

    /// Whether `path` is a note this source lists. Paths in excluded or hidden
    /// folders are not, even when the file exists.
    fn includes(&self, path: &str) -> bool;

    /// Every note file with its current stat, sorted by path.
    async fn list_files(&self) -> Result<Vec<FileStat>, VaultError>;

    async fn stat(&self, path: &str) -> Result<FileStat, VaultError>;

    async fn read_batch(&self, paths: &[String]) -> BTreeMap<String, Option<String>>;

    async fn read_file(&self, path: &str) -> Result<String, VaultError>;
}

/// [`VaultSource`] over the local filesystem.
#[derive(Debug, Clone)]
pub struct FsVault {
    walker: VaultWalker,
}

impl FsVault {
    pub fn open(root: &Path) -> Result<Self, VaultError> {
        Ok(Self { walker: VaultWalker::new(root)? })
    }

    pub fn with_exclusions(root: &Path, excluded: Vec<PathBuf>) -> Result<Self, VaultError> {
        Ok(Self { walker: VaultWalker::with_exclusions(root, excluded)? })
    }

    fn absolute(&self, path: &str) -> PathBuf {
        self.walker.root().join(normalize_path(path))
    }
}

impl VaultSource for FsVault {
    fn root(&self) -> &Path {
        self.walker.root()
    }

    fn includes(&self, path: &str) -> bool {
        self.walker.includes(path)
    }

    async fn list_files(&self) -> Result<Vec<FileStat>, VaultError> {
        let walker = self.walker.clone();
        let files = tokio::task::spawn_blocking(move || walker.walk())
            .await
            .map_err(|e| VaultError::TaskFailed(e.to_string()))??;
        Ok(files.iter().map(FileStat::from).collect())
    }

    async fn stat(&self, path: &str) -> Result<FileStat, VaultError> {
        let absolute = self.absolute(path);
        let metadata = tokio::fs::metadata(&absolute)
            .await
            .map_err(|e| VaultError::MetadataError(absolute.display().to_string(), e))?;
        Ok(FileStat::from_metadata(path, &metadata))
    }

    async fn read_batch(&self, paths: &[String]) -> BTreeMap<String, Option<String>> {
        let mut reads = JoinSet::new();
        for path in paths {
            let path = path.clone();
            let absolute = self.absolute(&path);
            reads.spawn(async move {
                let content = match tokio::fs::read_to_string(&absolute).await {
                    Ok(content) => Some(content),
                    Err(e) => {
                        tracing::warn!("Failed to read {}: {}", absolute.display(), e);
                        None
                    }
                };
                (path, content)
            });
        }

        let mut contents: BTreeMap<String, Option<String>> =
            paths.iter().map(|p| (p.clone(), None)).collect();
        while let Some(joined) = reads.join_next().await {
            match joined {
                Ok((path, content)) => {
                    contents.insert(path, content);
                }
                Err(e) => tracing::warn!("Batch read task failed: {}", e),
            }
        }
        contents
    }

    async fn read_file(&self, path: &str) -> Result<String, VaultError> {
        let absolute = self.absolute(path);
        tokio::fs::read_to_string(&absolute)
            .await
            .map_err(|source| VaultError::ReadError { path: path.to_string(), source })
    }
}
