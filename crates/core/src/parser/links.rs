//! Wikilink extraction.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::SourceLine;
use super::media::is_image_path;

static WIKILINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Matches [[target]] or [[target|alias]], optionally as an embed ![[...]]
    // Captures:
    // 1: embed marker
    // 2: target (may include #section or ^block)
    Regex::new(r"(!?)\[\[([^\[\]|]+)(?:\|[^\[\]]*)?\]\]").unwrap()
});

/// Extract deduplicated link targets in first-seen order.
///
/// Aliases are dropped. Image embeds (`![[pic.png]]`) are not links.
pub(crate) fn extract(lines: &[SourceLine<'_>]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for line in lines {
        for cap in WIKILINK_RE.captures_iter(line.text) {
            let embed = cap.get(1).is_some_and(|m| !m.as_str().is_empty());
            let target = cap.get(2).map(|m| m.as_str().trim()).unwrap_or("");
            if target.is_empty() || (embed && is_image_path(target)) {
                continue;
            }
            if seen.insert(target) {
                links.push(target.to_string());
            }
        }
    }

    links
}
