//! Template definitions, registry and recursive expansion.

pub mod expander;
pub mod registry;
pub mod template;

use thiserror::Error;

use crate::error::ErrorKind;

pub use expander::{DEFAULT_MAX_DEPTH, ExpandError, Expander, MAX_DEPTH_CEILING};
pub use registry::TemplateRegistry;
pub use template::{Parameter, Template, TemplateOptions};

/// Errors raised while parsing template definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("parameter \"{param}\" is declared twice in template \"{template}\"")]
    DuplicateParameter { template: String, param: String },
}

impl TemplateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateParameter { .. } => ErrorKind::DuplicateParameter,
        }
    }
}
