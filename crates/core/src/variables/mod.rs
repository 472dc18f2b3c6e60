//! Variables defined in data sources: tables, plots and derived figures.

pub mod plot;
pub mod store;
pub mod table;

use thiserror::Error;

use crate::error::ErrorKind;
use crate::metadata::MetadataError;

pub use plot::{Curve, FIGURE_PREFIX, Figure, Plot};
pub use store::VariableStore;
pub use table::Table;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("no such variable: {name}")]
    NotFound { name: String },

    #[error("variable '{name}' is a {found}, expected a {expected}")]
    WrongKind { name: String, expected: &'static str, found: &'static str },

    #[error("in definition of '{name}': {source}")]
    Metadata {
        name: String,
        #[source]
        source: MetadataError,
    },

    #[error("malformed table '{name}' (body line {line}): {reason}")]
    MalformedTable { name: String, line: usize, reason: String },
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::VariableNotFound,
            Self::WrongKind { .. } => ErrorKind::WrongVariableKind,
            Self::Metadata { source, .. } => source.kind(),
            Self::MalformedTable { .. } => ErrorKind::MalformedTable,
        }
    }
}

/// A variable found by name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Variable<'s> {
    Table(&'s Table),
    Plot(&'s Plot),
    Figure(&'s Figure),
}

impl<'s> Variable<'s> {
    pub fn name(&self) -> &'s str {
        match *self {
            Self::Table(t) => &t.name,
            Self::Plot(p) => &p.name,
            Self::Figure(f) => &f.name,
        }
    }

    pub fn title(&self) -> &'s str {
        match *self {
            Self::Table(t) => &t.title,
            Self::Plot(p) => &p.title,
            Self::Figure(f) => &f.title,
        }
    }

    pub fn label(&self) -> &'s str {
        match *self {
            Self::Table(t) => &t.label,
            Self::Plot(p) => &p.label,
            Self::Figure(f) => &f.label,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Table(_) => "table",
            Self::Plot(_) => "plot",
            Self::Figure(_) => "figure",
        }
    }
}
