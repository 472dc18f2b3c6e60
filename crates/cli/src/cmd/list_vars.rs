use super::{load_config, load_context};
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

#[derive(Debug, Serialize, Tabled)]
struct VariableRow {
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Label")]
    label: String,
}

pub fn run(config: Option<&Path>, profile: Option<&str>, json: bool) {
    let rc = load_config(config, profile, "list-vars");
    let ctx = load_context(&rc, "list-vars");

    let rows: Vec<VariableRow> = ctx
        .store()
        .iter()
        .map(|v| VariableRow {
            kind: v.kind_name(),
            name: v.name().to_string(),
            title: v.title().to_string(),
            label: v.label().to_string(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows).unwrap_or_default());
        return;
    }

    if rows.is_empty() {
        println!("(no variables found)");
        return;
    }

    let count = rows.len();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    println!("-- {count} variables --");
}
