//! Reference extraction from note text.
//!
//! Everything here is pure and total: malformed markup degrades to "no
//! match" and never fails. Body extractors skip the frontmatter block and
//! fenced code blocks, and report 1-based line numbers of the source file.

pub mod callouts;
pub mod links;
pub mod media;
pub mod outline;
pub mod tags;
pub mod tasks;

use std::path::Path;

use chrono::{Local, NaiveDateTime};

use crate::frontmatter::{self, Frontmatter};

pub use callouts::Callout;
pub use outline::{Block, Heading};
pub use tasks::{Task, TaskStats, parse_task_line};

/// Everything extracted from one note.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedNote {
    /// Raw link targets (alias removed), deduplicated.
    pub links: Vec<String>,
    /// Frontmatter tags followed by inline tags, deduplicated.
    pub tags: Vec<String>,
    pub headings: Vec<Heading>,
    pub blocks: Vec<Block>,
    pub tasks: Vec<Task>,
    pub external_links: Vec<String>,
    pub first_image: Option<String>,
    /// First callout eligible for a card preview.
    pub card_callout: Option<Callout>,
    pub frontmatter: Option<Frontmatter>,
    /// Companion document declared in frontmatter.
    pub source_pdf: Option<String>,
    /// Frontmatter `color`, with numeric canvas presets kept as their digits.
    pub color: Option<String>,
}

impl ParsedNote {
    pub fn task_stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.tasks)
    }
}

/// A body line and its 1-based line number in the file.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SourceLine<'a> {
    pub number: u32,
    pub text: &'a str,
}

/// Parse a note using the current local time for overdue detection.
pub fn parse_note(content: &str) -> ParsedNote {
    parse_note_at(content, Local::now().naive_local())
}

/// Parse a note, judging task due dates against `now`.
pub fn parse_note_at(content: &str, now: NaiveDateTime) -> ParsedNote {
    let doc = frontmatter::parse(content);
    let lines = body_lines(doc.body, doc.body_start_line);

    let mut tags = doc.frontmatter.as_ref().map(Frontmatter::tags).unwrap_or_default();
    tags::extract_into(&lines, &mut tags);

    ParsedNote {
        links: links::extract(&lines),
        tags,
        headings: outline::extract_headings(&lines),
        blocks: outline::extract_blocks(&lines),
        tasks: tasks::extract(&lines, now),
        external_links: media::extract_external_links(&lines),
        first_image: media::first_image(&lines),
        card_callout: callouts::extract(&lines).into_iter().next(),
        source_pdf: doc.frontmatter.as_ref().and_then(Frontmatter::source_pdf),
        color: doc.frontmatter.as_ref().and_then(Frontmatter::color),
        frontmatter: doc.frontmatter,
    }
}

/// Extract deduplicated wikilink targets from note content.
pub fn extract_links(content: &str) -> Vec<String> {
    let doc = frontmatter::parse(content);
    links::extract(&body_lines(doc.body, doc.body_start_line))
}

/// Extract frontmatter and inline tags from note content.
pub fn extract_tags(content: &str) -> Vec<String> {
    let doc = frontmatter::parse(content);
    let mut tags = doc.frontmatter.as_ref().map(Frontmatter::tags).unwrap_or_default();
    tags::extract_into(&body_lines(doc.body, doc.body_start_line), &mut tags);
    tags
}

/// Note title: the first level-1 heading, else the filename without extension.
pub fn note_title(headings: &[Heading], path: &str) -> String {
    headings
        .iter()
        .find(|h| h.level == 1)
        .map(|h| h.text.clone())
        .unwrap_or_else(|| {
            Path::new(path)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string()
        })
}

/// Body lines outside fenced code blocks. Fence delimiters are dropped too.
fn body_lines(body: &str, lines_before: usize) -> Vec<SourceLine<'_>> {
    let mut fence: Option<&str> = None;
    let mut lines = Vec::new();

    for (i, line) in body.lines().enumerate() {
        let trimmed = line.trim_start();
        let marker = if trimmed.starts_with("```") {
            Some("```")
        } else if trimmed.starts_with("~~~") {
            Some("~~~")
        } else {
            None
        };

        match (fence, marker) {
            (None, Some(open)) => fence = Some(open),
            (Some(open), Some(close)) if open == close => fence = None,
            (None, None) => {
                lines.push(SourceLine { number: (lines_before + i + 1) as u32, text: line })
            }
            _ => {}
        }
    }

    lines
}
