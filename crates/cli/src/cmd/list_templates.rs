use super::{load_config, load_context};
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

#[derive(Debug, Serialize, Tabled)]
struct TemplateRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Required")]
    required: String,
    #[tabled(rename = "Optional")]
    optional: String,
}

pub fn run(config: Option<&Path>, profile: Option<&str>, json: bool) {
    let rc = load_config(config, profile, "list-templates");
    let ctx = load_context(&rc, "list-templates");

    let rows: Vec<TemplateRow> = ctx
        .templates()
        .iter()
        .map(|t| TemplateRow {
            name: t.name.clone(),
            title: t.title.clone().unwrap_or_default(),
            required: t.required_params().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", "),
            optional: t
                .optional_params()
                .map(|p| format!("{}={}", p.name, p.default.as_deref().unwrap_or_default()))
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows).unwrap_or_default());
        return;
    }

    if rows.is_empty() {
        println!("(no templates found)");
        return;
    }

    let count = rows.len();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    println!("-- {count} templates --");
}
