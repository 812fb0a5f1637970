//! Inline `#tag` extraction.

use std::sync::LazyLock;

use regex::Regex;

use super::SourceLine;

static INLINE_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    // A tag starts the line or follows whitespace, so URL fragments and
    // heading markers (`# Title`) never match.
    Regex::new(r"(?:^|\s)#([\p{L}\p{N}_\-/]+)").unwrap()
});

/// Extract inline tags from body lines, appending to `tags` without duplicates.
pub(crate) fn extract_into(lines: &[SourceLine<'_>], tags: &mut Vec<String>) {
    for line in lines {
        for cap in INLINE_TAG_RE.captures_iter(line.text) {
            let Some(m) = cap.get(1) else { continue };
            let tag = m.as_str().trim_end_matches('/');
            // `#123` is an issue reference, not a tag
            if tag.is_empty() || tag.chars().all(char::is_numeric) {
                continue;
            }
            if !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
    }
}
