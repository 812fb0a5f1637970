//! Frontmatter splitting and field access.
//!
//! This module provides functionality to:
//! - Split a leading YAML frontmatter block from a markdown document
//! - Read the fields the graph engine cares about (`tags`, `source_pdf`, `color`)
//! - Convert the fields to JSON values for the metadata cache

pub mod parser;
pub mod types;

pub use parser::parse;
pub use types::{Frontmatter, ParsedDocument};
