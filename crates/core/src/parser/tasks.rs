//! Checklist items with optional due dates.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::SourceLine;

/// Urgency markers; a task containing any of them is critical.
const CRITICAL_MARKERS: &[&str] =
    &["#critical", "#urgent", "#important", "@critical", "@urgent", "!!", "[!]"];

static TASK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*]\s+\[([ xX])\](?:\s+(.*))?$").unwrap());

static DUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    // (@[[2030-01-01]]) or (@[[2030-01-01]] 09:00)
    Regex::new(r"\(@\[\[(\d{4}-\d{2}-\d{2})\]\](?:\s+(\d{1,2}:\d{2}))?\s*\)").unwrap()
});

/// A checklist item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Task text without the due-date annotation.
    pub text: String,
    pub completed: bool,
    pub due: Option<NaiveDateTime>,
    pub critical: bool,
    /// Incomplete and due strictly before the parse instant.
    pub overdue: bool,
    /// 1-based line number in the file.
    pub line: u32,
}

/// Aggregate task counts cached per note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    /// Open tasks carrying an urgency marker.
    pub critical: usize,
    pub overdue: usize,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |mut stats, task| {
            stats.total += 1;
            if task.completed {
                stats.completed += 1;
            } else if task.critical {
                stats.critical += 1;
            }
            if task.overdue {
                stats.overdue += 1;
            }
            stats
        })
    }

    pub fn open(&self) -> usize {
        self.total.saturating_sub(self.completed)
    }
}

pub(crate) fn extract(lines: &[SourceLine<'_>], now: NaiveDateTime) -> Vec<Task> {
    lines.iter().filter_map(|line| parse_task_line(line.text, line.number, now)).collect()
}

/// Parse a single checklist line.
pub fn parse_task_line(line: &str, number: u32, now: NaiveDateTime) -> Option<Task> {
    let cap = TASK_RE.captures(line)?;
    let completed = cap.get(1).is_some_and(|m| m.as_str() != " ");
    let raw = cap.get(2).map(|m| m.as_str()).unwrap_or("");

    let due = DUE_RE.captures(raw).and_then(|due| {
        let date = NaiveDate::parse_from_str(due.get(1)?.as_str(), "%Y-%m-%d").ok()?;
        let time = due
            .get(2)
            .and_then(|t| NaiveTime::parse_from_str(t.as_str(), "%H:%M").ok())
            .unwrap_or(NaiveTime::MIN);
        Some(date.and_time(time))
    });

    let lower = raw.to_lowercase();
    let critical = CRITICAL_MARKERS.iter().any(|marker| lower.contains(marker));
    let overdue = !completed && due.is_some_and(|d| d < now);

    let text = DUE_RE.replace_all(raw, "");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    Some(Task { text, completed, due, critical, overdue, line: number })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn test_due_date_with_time() {
        let task = parse_task_line("- [ ] Call dentist (@[[2030-01-01]] 09:00)", 1, now()).unwrap();
        assert!(!task.completed);
        assert_eq!(task.due, Some(at(2030, 1, 1, 9, 0)));
        assert!(!task.overdue);
        assert_eq!(task.text, "Call dentist");
    }

    #[test]
    fn test_completed_variant() {
        let task = parse_task_line("- [x] Call dentist (@[[2030-01-01]] 09:00)", 1, now()).unwrap();
        assert!(task.completed);
    }

    #[test]
    fn test_due_date_defaults_to_midnight() {
        let task = parse_task_line("* [ ] Pay rent (@[[2026-10-17]])", 1, now()).unwrap();
        assert_eq!(task.due, Some(at(2026, 10, 17, 0, 0)));
        assert!(task.overdue);
    }

    #[test]
    fn test_completed_task_never_overdue() {
        let task = parse_task_line("- [X] Old (@[[2001-01-01]])", 1, now()).unwrap();
        assert!(task.completed);
        assert!(!task.overdue);
    }

    #[test]
    fn test_invalid_date_means_no_due() {
        let task = parse_task_line("- [ ] Bad (@[[2026-13-45]])", 1, now()).unwrap();
        assert_eq!(task.due, None);
        assert!(!task.overdue);
    }

    #[rstest]
    #[case("- [ ] Ship it #urgent", true)]
    #[case("- [ ] Ship it @Critical", true)]
    #[case("- [ ] Ship it !!!", true)]
    #[case("- [ ] [!] Ship it", true)]
    #[case("- [ ] Ship it! now", false)]
    #[case("- [ ] Ship it #later", false)]
    fn test_critical_markers(#[case] line: &str, #[case] critical: bool) {
        assert_eq!(parse_task_line(line, 1, now()).unwrap().critical, critical);
    }

    #[rstest]
    #[case("- not a task")]
    #[case("-[ ] missing space")]
    #[case("+ [ ] wrong bullet")]
    #[case("- [y] wrong mark")]
    fn test_non_tasks(#[case] line: &str) {
        assert!(parse_task_line(line, 1, now()).is_none());
    }

    #[test]
    fn test_stats() {
        let tasks: Vec<Task> = [
            "- [ ] a #urgent (@[[2020-01-01]])",
            "- [x] b #urgent",
            "- [ ] c",
            "  - [x] nested d",
        ]
        .iter()
        .enumerate()
        .filter_map(|(i, l)| parse_task_line(l, i as u32 + 1, now()))
        .collect();
        let stats = TaskStats::from_tasks(&tasks);
        assert_eq!(stats, TaskStats { total: 4, completed: 2, critical: 1, overdue: 1 });
        assert_eq!(stats.open(), 2);
    }

    #[test]
    fn test_open_never_underflows() {
        // Stats deserialised from a hand-edited cache can be inconsistent.
        let stats = TaskStats { total: 1, completed: 3, ..Default::default() };
        assert_eq!(stats.open(), 0);
    }
}
