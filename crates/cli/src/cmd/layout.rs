use std::path::Path;

use notegraph_core::GraphOptions;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::output::print_json;
use super::{load_config, with_engine};
use crate::LayoutArgs;

#[derive(Serialize, Tabled)]
struct PositionRow {
    #[tabled(rename = "Node")]
    id: String,
    #[tabled(rename = "X")]
    x: f64,
    #[tabled(rename = "Y")]
    y: f64,
}

pub fn run(config: Option<&Path>, profile: Option<&str>, args: LayoutArgs) {
    let rc = load_config(config, profile);
    let options = rc.layout.options();
    let graph = GraphOptions { include_documents: !args.no_documents, include_tags: args.tags };

    with_engine(&rc, true, |engine| {
        let positions = engine.layout(args.algorithm, graph, &options);
        let rows: Vec<PositionRow> = positions
            .into_iter()
            .map(|(id, p)| PositionRow { id, x: p.x, y: p.y })
            .collect();

        if args.json {
            print_json(&rows);
        } else if rows.is_empty() {
            println!("(empty vault)");
        } else {
            println!("{} layout, {} nodes", args.algorithm, rows.len());
            println!("{}", Table::new(&rows).with(Style::rounded()));
        }
    });
}
