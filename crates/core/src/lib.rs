//! Core of `labgen`: turns lab-report sources written in a small
//! macro/template language into LaTeX.
//!
//! The pipeline is driven by a [`LabContext`]: template sources (`##name ..
//! ##` blocks) and data sources (`^^table .. ^^` and `$$plot .. $$` blocks)
//! are loaded into it, then [`LabContext::render`] expands `#template`
//! invocations and dispatches `@command` invocations.

#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod args;
pub mod commands;
pub mod config;
pub mod discovery;
pub mod error;
pub mod grammar;
pub mod metadata;
pub mod plotting;
pub mod render;
pub mod scripting;
pub mod templates;
pub mod variables;

pub use error::{ErrorKind, RenderError};
pub use render::{LabContext, Limits};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
