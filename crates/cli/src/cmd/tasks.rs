use std::path::Path;

use chrono::Local;
use notegraph_core::parser::TaskStats;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::output::print_json;
use super::{load_config, with_engine};
use crate::TasksArgs;

#[derive(Serialize, Tabled)]
struct TaskRow {
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Open")]
    open: usize,
    #[tabled(rename = "Done")]
    completed: usize,
    #[tabled(rename = "Critical")]
    critical: usize,
    #[tabled(rename = "Overdue")]
    overdue: usize,
}

impl TaskRow {
    fn new(path: &str, stats: &TaskStats) -> Self {
        Self {
            path: path.to_string(),
            open: stats.open(),
            completed: stats.completed,
            critical: stats.critical,
            overdue: stats.overdue,
        }
    }
}

pub fn run(config: Option<&Path>, profile: Option<&str>, args: TasksArgs) {
    let rc = load_config(config, profile);

    with_engine(&rc, true, |engine| {
        let mut rows: Vec<TaskRow> = engine
            .notes()
            .iter()
            .filter(|n| n.task_stats.total > 0)
            .map(|n| TaskRow::new(&n.path, &n.task_stats))
            .collect();

        // Most urgent first
        rows.sort_by(|a, b| {
            (b.overdue, b.critical, b.open)
                .cmp(&(a.overdue, a.critical, a.open))
                .then_with(|| a.path.cmp(&b.path))
        });

        if args.json {
            print_json(&rows);
            return;
        }

        if rows.is_empty() {
            println!("No tasks found.");
            return;
        }

        let open: usize = rows.iter().map(|r| r.open).sum();
        let overdue: usize = rows.iter().map(|r| r.overdue).sum();
        println!("{}", Table::new(&rows).with(Style::rounded()));
        println!(
            "{} open tasks across {} notes, {} overdue as of {}",
            open,
            rows.len(),
            overdue,
            Local::now().format("%Y-%m-%d %H:%M")
        );
    });
}
