//! Disk cache of parsed note metadata, keyed by file modification time.
//!
//! A note whose stored mtime still matches the file is rebuilt from its
//! cache entry without reading the file; everything else is re-read and
//! re-parsed by [`reconcile`].

pub mod reconcile;
pub mod store;
pub mod types;

pub use reconcile::{ReconcileStats, Reconciled, reconcile};
pub use store::{CacheError, DiskCache};
pub use types::{CACHE_VERSION, CacheEntry, CacheFile, CacheMap};
