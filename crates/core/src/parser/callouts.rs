//! Blockquote callouts used for card previews.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::SourceLine;

/// Callout types that carry a summary suitable for a card preview.
const CARD_CALLOUT_TYPES: &[&str] = &["summary", "tldr", "abstract", "note", "info"];

static CALLOUT_RE: LazyLock<Regex> = LazyLock::new(|| {
    // > [!type] optional title, with an optional fold marker: > [!note]- Title
    Regex::new(r"^\s*>\s*\[!([A-Za-z][\w-]*)\][+-]?\s*(.*)$").unwrap()
});

/// A typed admonition block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callout {
    /// Lower-cased callout type.
    pub kind: String,
    pub title: String,
    pub content: String,
    /// 1-based line number of the `> [!type]` line.
    pub line: u32,
}

/// Extract card-eligible callouts in document order.
pub(crate) fn extract(lines: &[SourceLine<'_>]) -> Vec<Callout> {
    let mut callouts = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(cap) = CALLOUT_RE.captures(lines[i].text) else {
            i += 1;
            continue;
        };
        let kind = cap.get(1).map(|m| m.as_str().to_lowercase()).unwrap_or_default();
        let title = cap.get(2).map(|m| m.as_str().trim()).unwrap_or("");
        let start = lines[i].number;

        let mut body = Vec::new();
        let mut prev = start;
        i += 1;
        while let Some(line) = lines.get(i) {
            if line.number != prev + 1 || CALLOUT_RE.is_match(line.text) {
                break;
            }
            let Some(rest) = line.text.trim_start().strip_prefix('>') else { break };
            body.push(rest.strip_prefix(' ').unwrap_or(rest).trim_end());
            prev = line.number;
            i += 1;
        }

        if CARD_CALLOUT_TYPES.contains(&kind.as_str()) {
            let title = if title.is_empty() { capitalize(&kind) } else { title.to_string() };
            let content = body.join("\n").trim().to_string();
            callouts.push(Callout { kind, title, content, line: start });
        }
    }

    callouts
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
