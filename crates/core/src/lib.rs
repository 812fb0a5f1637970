#![allow(clippy::module_name_repetitions)]

//! Note graph engine: reference parsing, link resolution, backlink indexing,
//! an mtime-keyed disk cache and deterministic graph layouts.

pub mod cache;
pub mod config;
pub mod engine;
pub mod frontmatter;
pub mod graph;
pub mod index;
pub mod layout;
pub mod parser;
pub mod vault;

pub use cache::DiskCache;
pub use engine::{EngineError, GraphEngine};
pub use graph::{GraphOptions, GraphSnapshot};
pub use index::{Note, NoteId, reindex, resolve_link};
pub use layout::{LayoutAlgorithm, LayoutOptions, compute_layout};
pub use parser::{ParsedNote, parse_note};
pub use vault::{FileChange, FileStat, FsVault, VaultSource};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
