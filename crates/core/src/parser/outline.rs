//! Headings and block anchors.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::SourceLine;

/// An ATX heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Number of leading `#` (1-6).
    pub level: u8,
    pub text: String,
    /// 1-based line number in the file.
    pub line: u32,
}

/// An addressable block (`^block-id` at the end of a line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    /// 1-based line number in the file.
    pub line: u32,
}

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})[ \t]+(.+?)[ \t]*$").unwrap());

static BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)\^([A-Za-z0-9_-]+)\s*$").unwrap());

pub(crate) fn extract_headings(lines: &[SourceLine<'_>]) -> Vec<Heading> {
    lines
        .iter()
        .filter_map(|line| {
            let cap = HEADING_RE.captures(line.text)?;
            let level = cap.get(1)?.as_str().len() as u8;
            // Strip an optional closing sequence: `## Title ##`
            let text = cap.get(2)?.as_str().trim_end_matches('#').trim_end();
            if text.is_empty() {
                return None;
            }
            Some(Heading { level, text: text.to_string(), line: line.number })
        })
        .collect()
}

pub(crate) fn extract_blocks(lines: &[SourceLine<'_>]) -> Vec<Block> {
    lines
        .iter()
        .filter_map(|line| {
            let cap = BLOCK_RE.captures(line.text)?;
            Some(Block { id: cap.get(1)?.as_str().to_string(), line: line.number })
        })
        .collect()
}
