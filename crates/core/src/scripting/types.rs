//! Scripting types and error definitions.

use thiserror::Error;

use crate::error::ErrorKind;

/// Errors that can occur while evaluating an expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Error from the Lua runtime.
    #[error("Lua error: {0}")]
    Lua(String),

    /// The expression did not produce numbers.
    #[error("expression `{expr}` returned {found}, expected a number or an array of numbers")]
    NotNumeric { expr: String, found: String },
}

impl EvalError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Evaluation
    }
}

impl From<mlua::Error> for EvalError {
    fn from(e: mlua::Error) -> Self {
        Self::Lua(e.to_string())
    }
}

/// Configuration for the Lua sandbox.
#[derive(Debug, Clone)]
pub struct SandboxConfig {
    /// Maximum memory the Lua VM can allocate (in bytes). 0 = unlimited.
    pub memory_limit: usize,

    /// Maximum instructions per evaluation. 0 = unlimited.
    pub instruction_limit: u32,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self::restricted()
    }
}

impl SandboxConfig {
    /// A restrictive sandbox suitable for user expressions.
    pub fn restricted() -> Self {
        Self {
            memory_limit: 10 * 1024 * 1024, // 10 MB
            instruction_limit: 1_000_000,
        }
    }

    /// Largest array a helper may build on the Rust side.
    pub fn max_points(&self) -> usize {
        if self.memory_limit == 0 {
            UNBOUNDED_MAX_POINTS
        } else {
            self.memory_limit / std::mem::size_of::<f64>()
        }
    }
}

const UNBOUNDED_MAX_POINTS: usize = 1 << 24;
