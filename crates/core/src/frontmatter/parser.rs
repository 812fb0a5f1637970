//! Frontmatter splitting from markdown documents.

use super::types::{Frontmatter, ParsedDocument};

/// Split frontmatter from markdown content.
///
/// Frontmatter is delimited by `---` lines at the start of the document:
/// ```markdown
/// ---
/// key: value
/// ---
/// # Document content
/// ```
///
/// Parsing is lenient: a block with invalid YAML is still removed from the
/// body, it just yields no fields. A document whose opening `---` is never
/// closed is treated as having no frontmatter.
pub fn parse(content: &str) -> ParsedDocument<'_> {
    let Some((yaml, body_start_line, body)) = split(content) else {
        return ParsedDocument { frontmatter: None, body: content, body_start_line: 0 };
    };

    let frontmatter = if yaml.trim().is_empty() {
        Some(Frontmatter::default())
    } else {
        match serde_yaml::from_str::<Frontmatter>(yaml) {
            Ok(fm) => Some(fm),
            Err(e) => {
                tracing::debug!("ignoring invalid frontmatter: {}", e);
                None
            }
        }
    };

    ParsedDocument { frontmatter, body, body_start_line }
}

/// Returns `(yaml, lines_before_body, body)`.
fn split(content: &str) -> Option<(&str, usize, &str)> {
    let mut lines = content.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_start_matches('\u{feff}').trim_end() != "---" {
        return None;
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for (i, line) in lines.enumerate() {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            let yaml = &content[yaml_start..offset];
            let body = &content[offset + line.len()..];
            return Some((yaml, i + 2, body));
        }
        offset += line.len();
    }
    None
}
