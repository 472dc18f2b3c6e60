//! Command registry, argument binding and the built-in commands.
//!
//! Commands are invoked as `@name` or `@name||args||` after template
//! expansion. Each command carries a static manifest of declared
//! parameters and optional keywords that call-site arguments are bound to.

pub mod builtins;
pub mod registry;

use thiserror::Error;

use crate::error::ErrorKind;
use crate::plotting::PlotError;
use crate::scripting::EvalError;
use crate::variables::StoreError;

pub use builtins::BUILTINS;
pub use registry::{Call, Command, CommandRegistry, Handler};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("no such command: @{name}")]
    UnknownCommand { name: String },

    #[error("@{command}: missing argument '{param}'")]
    MissingArgument { command: String, param: String },

    #[error("@{command}: invalid argument '{param}': {reason}")]
    InvalidArgument { command: String, param: String, reason: String },

    #[error(transparent)]
    Variable(#[from] StoreError),

    #[error("evaluating curve '{curve}' of plot '{plot}': {source}")]
    Evaluation {
        plot: String,
        curve: String,
        #[source]
        source: EvalError,
    },

    #[error(transparent)]
    Plotting(#[from] PlotError),
}

impl CommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownCommand { .. } => ErrorKind::UnknownCommand,
            Self::MissingArgument { .. } => ErrorKind::MissingArgument,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::Variable(e) => e.kind(),
            Self::Evaluation { .. } => ErrorKind::Evaluation,
            Self::Plotting(e) => e.kind(),
        }
    }
}
