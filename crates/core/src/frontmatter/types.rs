//! Frontmatter types and data structures.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;

/// Frontmatter keys that may name a companion document.
const SOURCE_DOCUMENT_KEYS: &[&str] = &["source_pdf", "pdf"];

/// Represents parsed YAML frontmatter from a markdown document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Fields as key-value pairs.
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

/// Result of splitting frontmatter from markdown.
#[derive(Debug, Clone)]
pub struct ParsedDocument<'a> {
    /// Parsed frontmatter (if present and valid YAML).
    pub frontmatter: Option<Frontmatter>,
    /// The markdown body (everything after the frontmatter block).
    pub body: &'a str,
    /// Number of source lines that precede the body.
    pub body_start_line: usize,
}

impl Frontmatter {
    /// Tags declared under `tags:`.
    ///
    /// Accepts an inline list (`[a, b]`), a dash list, or a single string
    /// separated by commas and/or whitespace. A leading `#` is stripped.
    pub fn tags(&self) -> Vec<String> {
        let mut tags = Vec::new();
        match self.fields.get("tags") {
            Some(Value::Sequence(items)) => {
                for item in items {
                    if let Some(tag) = scalar_to_string(item) {
                        push_tag(&mut tags, &tag);
                    }
                }
            }
            Some(value) => {
                if let Some(raw) = scalar_to_string(value) {
                    for part in raw.split(|c: char| c == ',' || c.is_whitespace()) {
                        push_tag(&mut tags, part);
                    }
                }
            }
            None => {}
        }
        tags
    }

    /// Companion document declared by this note, if any.
    pub fn source_pdf(&self) -> Option<String> {
        SOURCE_DOCUMENT_KEYS
            .iter()
            .filter_map(|key| self.fields.get(*key))
            .filter_map(|v| v.as_str())
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(|s| strip_wikilink(s).to_string())
    }

    /// Display colour assigned to the note (`color:`).
    pub fn color(&self) -> Option<String> {
        self.fields.get("color").and_then(scalar_to_string).filter(|s| !s.is_empty())
    }

    /// Convert fields to JSON values. Fields that cannot be represented
    /// (e.g. mappings with non-string keys) are skipped.
    pub fn to_json(&self) -> BTreeMap<String, serde_json::Value> {
        self.fields
            .iter()
            .filter_map(|(k, v)| serde_json::to_value(v).ok().map(|json| (k.clone(), json)))
            .collect()
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn push_tag(tags: &mut Vec<String>, raw: &str) {
    let tag = raw.trim().trim_start_matches('#');
    if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
        tags.push(tag.to_string());
    }
}

/// `source_pdf: "[[paper.pdf]]"` is written by some editors; keep the target only.
fn strip_wikilink(s: &str) -> &str {
    s.strip_prefix("[[").and_then(|s| s.strip_suffix("]]")).unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fm(yaml: &str) -> Frontmatter {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_tags_inline_list() {
        assert_eq!(fm("tags: [rust, '#graph']").tags(), vec!["rust", "graph"]);
    }

    #[test]
    fn test_tags_dash_list() {
        assert_eq!(fm("tags:\n  - one\n  - two\n  - one").tags(), vec!["one", "two"]);
    }

    #[test]
    fn test_tags_plain_string() {
        assert_eq!(fm("tags: alpha, beta gamma").tags(), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_source_pdf_variants() {
        assert_eq!(fm("source_pdf: papers/a.pdf").source_pdf().as_deref(), Some("papers/a.pdf"));
        assert_eq!(fm("pdf: \"[[b.pdf]]\"").source_pdf().as_deref(), Some("b.pdf"));
        assert_eq!(fm("title: x").source_pdf(), None);
    }

    #[test]
    fn test_to_json_keeps_scalars_and_lists() {
        let json = fm("title: Hello\ncount: 3\ntags: [a]").to_json();
        assert_eq!(json["title"], serde_json::json!("Hello"));
        assert_eq!(json["count"], serde_json::json!(3));
        assert_eq!(json["tags"], serde_json::json!(["a"]));
    }
}
