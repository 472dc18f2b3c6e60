//! Recursive template expansion.
//!
//! Every invocation site is interpolated and the result is expanded again
//! before being spliced back, so templates may invoke other templates. A
//! template invoking itself directly is rejected; longer cycles and overly
//! deep chains are stopped by a hard depth limit.

use thiserror::Error;
use tracing::debug;

use super::registry::TemplateRegistry;
use crate::args::parse_args;
use crate::error::{ErrorKind, Span};
use crate::grammar::{Invocation, InvocationGrammar};

/// Default maximum number of nested template expansions.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Largest accepted depth limit. Expansion recurses on the native stack.
pub const MAX_DEPTH_CEILING: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    #[error("no such template: #{name} (stack: [{}])", .stack.join("->"))]
    UnknownTemplate { name: String, stack: Vec<String> },

    #[error("recursive template calls are not allowed: #{name} (stack: [{}])", .stack.join("->"))]
    DirectRecursionDetected { name: String, stack: Vec<String> },

    #[error("template expansion deeper than {limit} levels (stack: [{}])", .stack.join("->"))]
    ExpansionDepthExceeded { limit: usize, stack: Vec<String> },

    #[error("parameter \"{param}\" is not defined for template \"{template}\"")]
    UndefinedParameter { template: String, param: String },

    #[error("no value found for parameter \"{param}\" of template \"{template}\"")]
    UnresolvedParameter { template: String, param: String },
}

impl ExpandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownTemplate { .. } => ErrorKind::UnknownTemplate,
            Self::DirectRecursionDetected { .. } => ErrorKind::DirectRecursionDetected,
            Self::ExpansionDepthExceeded { .. } => ErrorKind::ExpansionDepthExceeded,
            Self::UndefinedParameter { .. } => ErrorKind::UndefinedParameter,
            Self::UnresolvedParameter { .. } => ErrorKind::UnresolvedParameter,
        }
    }
}

/// Expands template invocations against a registry.
#[derive(Debug, Clone, Copy)]
pub struct Expander<'r> {
    registry: &'r TemplateRegistry,
    grammar: &'r InvocationGrammar,
    max_depth: usize,
}

impl<'r> Expander<'r> {
    pub fn new(registry: &'r TemplateRegistry, grammar: &'r InvocationGrammar) -> Self {
        Self { registry, grammar, max_depth: DEFAULT_MAX_DEPTH }
    }

    /// Set the depth limit, clamped to `1..=MAX_DEPTH_CEILING`.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.clamp(1, MAX_DEPTH_CEILING);
        self
    }

    pub fn expand(&self, text: &str) -> Result<String, ExpandError> {
        self.expand_located(text).map_err(|(e, _)| e)
    }

    /// Like [`Expander::expand`], but reports the span of the top-level
    /// invocation that failed.
    pub fn expand_located(&self, text: &str) -> Result<String, (ExpandError, Span)> {
        let mut stack = Vec::new();
        self.grammar.try_replace(text, |site| {
            self.expand_site(site, &mut stack).map_err(|e| (e, site.span))
        })
    }

    fn expand_text(&self, text: &str, stack: &mut Vec<String>) -> Result<String, ExpandError> {
        self.grammar.try_replace(text, |site| self.expand_site(site, stack))
    }

    fn expand_site(
        &self,
        site: &Invocation<'_>,
        stack: &mut Vec<String>,
    ) -> Result<String, ExpandError> {
        let name = site.name;

        if stack.last().is_some_and(|caller| caller == name) {
            return Err(ExpandError::DirectRecursionDetected {
                name: name.to_string(),
                stack: stack.clone(),
            });
        }
        if stack.len() >= self.max_depth {
            return Err(ExpandError::ExpansionDepthExceeded {
                limit: self.max_depth,
                stack: stack.clone(),
            });
        }

        let template = self.registry.get(name).ok_or_else(|| ExpandError::UnknownTemplate {
            name: name.to_string(),
            stack: stack.clone(),
        })?;

        let args = parse_args(site.args.unwrap_or(""));
        debug!(
            depth = stack.len(),
            "applying substitution {args} in [{}]",
            stack.iter().map(String::as_str).chain([name]).collect::<Vec<_>>().join("->")
        );
        let interpolated = template.interpolate(&args)?;

        stack.push(name.to_string());
        let expanded = self.expand_text(&interpolated, stack);
        stack.pop();
        expanded
    }
}
