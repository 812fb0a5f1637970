//! Note model, link resolution and the backlink index.
//!
//! Single-reference resolution and the batch backlink pass share one
//! matching policy through [`LinkIndex`].
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use notegraph_core::index::{Note, reindex, resolve_link};
//! use notegraph_core::parser::parse_note;
//! use notegraph_core::vault::FileStat;
//!
//! let a = Note::from_parsed(&FileStat::new("A.md", Utc::now()), parse_note("# A\n\n[[B]]"), None);
//! let b = Note::from_parsed(&FileStat::new("B.md", Utc::now()), parse_note("# B"), None);
//! let notes = vec![a, b];
//!
//! assert_eq!(resolve_link("B", &notes).map(|n| n.path.as_str()), Some("B.md"));
//!
//! let indexed = reindex(&notes);
//! assert!(indexed[0].incoming_links.is_empty());
//! assert!(indexed[1].incoming_links.contains(&indexed[0].id));
//! ```

pub mod backlinks;
pub mod resolver;
pub mod types;

pub use backlinks::{LinkStats, link_stats, reindex, reindex_with};
pub use resolver::{Anchor, LinkIndex, ResolvedAnchor, resolve_anchor, resolve_link};
pub use types::{Note, NoteId, normalize_path};
