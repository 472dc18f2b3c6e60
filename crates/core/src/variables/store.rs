use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::plot::{Figure, Plot};
use super::table::Table;
use super::{StoreError, Variable};
use crate::grammar::Syntax;
use crate::metadata::{Converters, PLOT_PROPERTIES, TABLE_PROPERTIES, is_assignment, parse_metadata};

/// Named tables, plots and the figures derived from plots.
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    tables: BTreeMap<String, Table>,
    plots: BTreeMap<String, Plot>,
    figures: BTreeMap<String, Figure>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every table and plot block of a data source. Returns the
    /// number of variables defined.
    pub fn load_source(
        &mut self,
        text: &str,
        syntax: &Syntax,
        converters: &Converters,
    ) -> Result<usize, StoreError> {
        let mut count = 0;
        for def in syntax.table_definition.find_all(text) {
            let table = parse_table(def.name, def.title, def.body, converters)?;
            self.insert_table(table);
            count += 1;
        }
        for def in syntax.plot_definition.find_all(text) {
            let metadata = parse_metadata(def.body, &PLOT_PROPERTIES, converters)
                .map_err(|source| StoreError::Metadata { name: def.name.to_string(), source })?;
            let plot = Plot {
                name: def.name.to_string(),
                title: title_or_name(def.title, def.name),
                label: Plot::label_for(def.name),
                metadata,
            };
            debug!(plot = %plot.name, metadata = %plot.metadata, "created plot variable");
            self.insert_plot(plot);
            count += 1;
        }
        Ok(count)
    }

    pub fn insert_table(&mut self, table: Table) {
        if self.tables.contains_key(&table.name) {
            warn!(table = %table.name, "table redefined");
        }
        self.tables.insert(table.name.clone(), table);
    }

    /// Register a plot together with its derived figure.
    pub fn insert_plot(&mut self, plot: Plot) {
        if self.plots.contains_key(&plot.name) {
            warn!(plot = %plot.name, "plot redefined");
        }
        let figure = Figure::for_plot(&plot);
        self.figures.insert(figure.name.clone(), figure);
        self.plots.insert(plot.name.clone(), plot);
    }

    /// Look a variable up across tables, plots and figures.
    pub fn find(&self, name: &str) -> Result<Variable<'_>, StoreError> {
        if let Some(t) = self.tables.get(name) {
            return Ok(Variable::Table(t));
        }
        if let Some(p) = self.plots.get(name) {
            return Ok(Variable::Plot(p));
        }
        if let Some(f) = self.figures.get(name) {
            return Ok(Variable::Figure(f));
        }
        Err(StoreError::NotFound { name: name.to_string() })
    }

    pub fn table(&self, name: &str) -> Result<&Table, StoreError> {
        match self.find(name)? {
            Variable::Table(t) => Ok(t),
            other => Err(StoreError::WrongKind {
                name: name.to_string(),
                expected: "table",
                found: other.kind_name(),
            }),
        }
    }

    pub fn plot(&self, name: &str) -> Result<&Plot, StoreError> {
        match self.find(name)? {
            Variable::Plot(p) => Ok(p),
            other => Err(StoreError::WrongKind {
                name: name.to_string(),
                expected: "plot",
                found: other.kind_name(),
            }),
        }
    }

    pub fn figure(&self, name: &str) -> Result<&Figure, StoreError> {
        match self.find(name)? {
            Variable::Figure(f) => Ok(f),
            other => Err(StoreError::WrongKind {
                name: name.to_string(),
                expected: "figure",
                found: other.kind_name(),
            }),
        }
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn plots(&self) -> impl Iterator<Item = &Plot> {
        self.plots.values()
    }

    pub fn figures(&self) -> impl Iterator<Item = &Figure> {
        self.figures.values()
    }

    /// Every variable: tables, then plots, then figures, each in name order.
    pub fn iter(&self) -> impl Iterator<Item = Variable<'_>> {
        self.tables
            .values()
            .map(Variable::Table)
            .chain(self.plots.values().map(Variable::Plot))
            .chain(self.figures.values().map(Variable::Figure))
    }

    pub fn len(&self) -> usize {
        self.tables.len() + self.plots.len() + self.figures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn title_or_name(title: Option<&str>, name: &str) -> String {
    match title.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => name.to_string(),
    }
}

/// Header assignments first, then whitespace-separated numeric rows.
fn parse_table(
    name: &str,
    title: Option<&str>,
    body: &str,
    converters: &Converters,
) -> Result<Table, StoreError> {
    let mut header = String::new();
    let mut data = Vec::new();
    for (lineno, line) in body.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if is_assignment(line) {
            header.push_str(line);
            header.push('\n');
        } else {
            data.push((lineno, line));
        }
    }

    let metadata = parse_metadata(&header, &TABLE_PROPERTIES, converters)
        .map_err(|source| StoreError::Metadata { name: name.to_string(), source })?;
    let width = metadata.get_list("cols").map_or(0, <[String]>::len);

    let mut rows = Vec::with_capacity(data.len());
    for (lineno, line) in data {
        let row = line
            .split_whitespace()
            .map(|cell| {
                cell.parse::<f64>().map_err(|_| StoreError::MalformedTable {
                    name: name.to_string(),
                    line: lineno,
                    reason: format!("'{cell}' is not a number"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if row.len() != width {
            return Err(StoreError::MalformedTable {
                name: name.to_string(),
                line: lineno,
                reason: format!("expected {width} values, found {}", row.len()),
            });
        }
        rows.push(row);
    }

    let table = Table {
        name: name.to_string(),
        title: title_or_name(title, name),
        label: Table::label_for(name),
        metadata,
        rows,
    };
    debug!(table = %table.name, metadata = %table.metadata, rows = table.rows.len(), "created table variable");
    Ok(table)
}
