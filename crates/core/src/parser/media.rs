//! External links and image references.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::SourceLine;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp", "bmp"];

static MARKDOWN_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Matches [text](url) and ![alt](src), with an optional "title"
    // Captures:
    // 1: image marker
    // 2: url
    Regex::new(r#"(!?)\[[^\]]*\]\(\s*<?([^)\s>]+)>?(?:\s+"[^"]*")?\s*\)"#).unwrap()
});

static IMAGE_EMBED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[\[([^\[\]|]+)(?:\|[^\[\]]*)?\]\]").unwrap());

static BARE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s<>()\[\]]+").unwrap());

/// Whether a link target names an image file.
pub(crate) fn is_image_path(target: &str) -> bool {
    let lower = target.to_lowercase();
    lower
        .rsplit_once('.')
        .is_some_and(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext))
}

fn is_external(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// External `http(s)` URLs, from markdown links and bare URLs, deduplicated.
pub(crate) fn extract_external_links(lines: &[SourceLine<'_>]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();
    let mut push = |url: &str| {
        if seen.insert(url.to_string()) {
            urls.push(url.to_string());
        }
    };

    for line in lines {
        for cap in MARKDOWN_LINK_RE.captures_iter(line.text) {
            let image = cap.get(1).is_some_and(|m| !m.as_str().is_empty());
            if let Some(url) = cap.get(2).map(|m| m.as_str())
                && !image
                && is_external(url)
            {
                push(url);
            }
        }

        let rest = MARKDOWN_LINK_RE.replace_all(line.text, " ");
        for m in BARE_URL_RE.find_iter(&rest) {
            let url = m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?', '\'', '"']);
            push(url);
        }
    }

    urls
}

/// The first image referenced in the document, either `![alt](src)` or `![[file.png]]`.
pub(crate) fn first_image(lines: &[SourceLine<'_>]) -> Option<String> {
    for line in lines {
        let markdown = MARKDOWN_LINK_RE
            .captures_iter(line.text)
            .filter(|cap| cap.get(1).is_some_and(|m| !m.as_str().is_empty()))
            .filter_map(|cap| Some((cap.get(0)?.start(), cap.get(2)?.as_str())))
            .next();
        let embed = IMAGE_EMBED_RE
            .captures_iter(line.text)
            .filter_map(|cap| Some((cap.get(0)?.start(), cap.get(1)?.as_str().trim())))
            .find(|(_, target)| is_image_path(target));

        let first = match (markdown, embed) {
            (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
            (a, b) => a.or(b),
        };
        if let Some((_, src)) = first {
            return Some(src.to_string());
        }
    }
    None
}
