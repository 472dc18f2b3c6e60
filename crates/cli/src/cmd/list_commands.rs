use labgen_core::commands::CommandRegistry;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct CommandRow {
    #[tabled(rename = "Command")]
    manifest: String,
    #[tabled(rename = "Summary")]
    summary: &'static str,
}

pub fn run() {
    let registry = CommandRegistry::with_builtins();
    let rows: Vec<CommandRow> = registry
        .iter()
        .map(|c| CommandRow { manifest: c.to_string(), summary: c.summary })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    println!("-- {} commands --", registry.len());
}
