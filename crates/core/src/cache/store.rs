//! Cache file persistence.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::types::{CACHE_VERSION, CacheFile, CacheMap};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cache file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cache version {found} does not match {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("cache belongs to vault {found}, expected {expected}")]
    VaultMismatch { found: String, expected: String },
}

/// One JSON cache file per vault inside `dir`.
#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<dir>/<vault key>.json`.
    pub fn cache_path(&self, vault_path: &Path) -> PathBuf {
        self.dir.join(format!("{}.json", vault_key(vault_path)))
    }

    /// Load entries for `vault_path`, reporting why a cache was unusable.
    ///
    /// A missing file is `Ok(None)`. Entries with a stale version are dropped.
    pub fn try_load(&self, vault_path: &Path) -> Result<Option<CacheMap>, CacheError> {
        let path = self.cache_path(vault_path);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(CacheError::Io { path, source }),
        };

        let file: CacheFile =
            serde_json::from_str(&raw).map_err(|source| CacheError::Json { path, source })?;

        if file.version != CACHE_VERSION {
            return Err(CacheError::VersionMismatch { found: file.version, expected: CACHE_VERSION });
        }
        let expected = vault_path.display().to_string();
        if file.vault_path != expected {
            return Err(CacheError::VaultMismatch { found: file.vault_path, expected });
        }

        let total = file.entries.len();
        let entries: CacheMap =
            file.entries.into_iter().filter(|(_, e)| e.version == CACHE_VERSION).collect();
        if entries.len() < total {
            debug!("Dropped {} cache entries with a stale version", total - entries.len());
        }
        Ok(Some(entries))
    }

    /// Load entries for `vault_path`. Any failure is logged and treated as a miss.
    pub fn load(&self, vault_path: &Path) -> Option<CacheMap> {
        match self.try_load(vault_path) {
            Ok(Some(entries)) => {
                info!("Loaded {} cache entries from {}", entries.len(), self.dir.display());
                Some(entries)
            }
            Ok(None) => {
                debug!("No cache file for {}", vault_path.display());
                None
            }
            Err(e) => {
                warn!("Ignoring unusable cache: {}", e);
                None
            }
        }
    }

    /// [`DiskCache::load`] on the blocking pool. Must be called from within a Tokio runtime.
    pub async fn load_in_background(&self, vault_path: PathBuf) -> Option<CacheMap> {
        let cache = self.clone();
        match tokio::task::spawn_blocking(move || cache.load(&vault_path)).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cache load task failed: {}", e);
                None
            }
        }
    }

    /// Replace the cache file with `entries`.
    ///
    /// The document is written to a sibling temp file and renamed into place,
    /// so readers see either the old map or the new one.
    pub fn save(&self, vault_path: &Path, entries: &CacheMap) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir)
            .map_err(|source| CacheError::Io { path: self.dir.clone(), source })?;

        let path = self.cache_path(vault_path);
        let tmp = path.with_extension("json.tmp");
        let file = CacheFile {
            version: CACHE_VERSION,
            vault_path: vault_path.display().to_string(),
            entries: entries.clone(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|source| CacheError::Json { path: path.clone(), source })?;

        fs::write(&tmp, json).map_err(|source| CacheError::Io { path: tmp.clone(), source })?;
        fs::rename(&tmp, &path).map_err(|source| CacheError::Io { path: path.clone(), source })?;

        debug!("Saved {} cache entries to {}", entries.len(), path.display());
        Ok(())
    }

    /// Save on the blocking pool without making the caller wait.
    ///
    /// When `after` is given the write starts only once that earlier save has
    /// finished, so an older map never lands on top of a newer one. Failures are
    /// logged, never returned. Must be called from within a Tokio runtime.
    pub fn save_in_background(
        &self,
        vault_path: PathBuf,
        entries: CacheMap,
        after: Option<JoinHandle<()>>,
    ) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            if let Some(previous) = after
                && let Err(e) = previous.await
            {
                warn!("Previous cache save did not complete: {}", e);
            }

            let saved =
                tokio::task::spawn_blocking(move || cache.save(&vault_path, &entries)).await;
            match saved {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Failed to save cache: {}", e),
                Err(e) => warn!("Cache save task failed: {}", e),
            }
        })
    }
}

/// First 16 hex characters of the SHA-256 of the vault path.
fn vault_key(vault_path: &Path) -> String {
    let digest = Sha256::digest(vault_path.display().to_string().as_bytes());
    hex::encode(&digest[..8])
}
