//! Numeric expression evaluation for plot curves.
//!
//! Curve coordinates are written as expressions over table columns. The
//! render pipeline only talks to the [`ExpressionEvaluator`] trait; the
//! shipped implementation is [`LuaEvaluator`], a sandboxed Lua state.
//!
//! # Security
//!
//! The Lua environment is sandboxed to prevent:
//! - File system access (`io` library removed)
//! - Shell command execution (`os` library removed)
//! - Loading external modules (`require` removed)
//! - Arbitrary code loading (`load`, `loadfile`, `dofile` removed)
//! - Debug library access (`debug` removed)

pub mod bindings;
pub mod engine;
pub mod types;

use std::collections::BTreeMap;

pub use engine::LuaEvaluator;
pub use types::{EvalError, SandboxConfig};

use crate::variables::Table;

/// Named numeric columns plus a prelude that runs before the expression.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    tables: BTreeMap<String, Vec<(String, Vec<f64>)>>,
    prelude: String,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_table(&mut self, name: impl Into<String>, columns: Vec<(String, Vec<f64>)>) {
        self.tables.insert(name.into(), columns);
    }

    pub fn bind(&mut self, table: &Table) {
        let columns =
            table.named_columns().into_iter().map(|(name, values)| (name.to_string(), values));
        self.bind_table(table.name.clone(), columns.collect());
    }

    pub fn set_prelude(&mut self, prelude: impl Into<String>) {
        self.prelude = prelude.into();
    }

    pub fn tables(&self) -> impl Iterator<Item = (&String, &Vec<(String, Vec<f64>)>)> {
        self.tables.iter()
    }

    /// Values of `table.column`, if bound.
    pub fn column(&self, table: &str, column: &str) -> Option<&[f64]> {
        self.tables
            .get(table)?
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, values)| values.as_slice())
    }

    pub fn prelude(&self) -> &str {
        &self.prelude
    }
}

/// Evaluates an expression against a scope to an array of numbers.
pub trait ExpressionEvaluator {
    fn evaluate(&self, scope: &Scope, expr: &str) -> Result<Vec<f64>, EvalError>;
}
