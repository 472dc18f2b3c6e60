//! Shared error taxonomy.
//!
//! Every module owns its own error enum; each of them reports one
//! [`ErrorKind`] tag so callers can classify failures without matching on
//! every concrete type.

use std::fmt;

use thiserror::Error;

use crate::commands::CommandError;
use crate::templates::ExpandError;

/// Tag identifying the class of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // Grammar errors
    Grammar,
    UnknownProperty,
    NoConverterForKind,
    InvalidValue,

    // Structural errors
    DanglingSubProperty,
    MissingRequiredProperty,
    UnknownTemplate,
    UnknownCommand,
    DuplicateParameter,
    MalformedTable,

    // Expansion errors
    DirectRecursionDetected,
    ExpansionDepthExceeded,
    UndefinedParameter,
    UnresolvedParameter,

    // Command dispatch and collaborators
    MissingArgument,
    InvalidArgument,
    VariableNotFound,
    WrongVariableKind,
    Evaluation,
    Rendering,

    // Environment
    Config,
    Io,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grammar => "grammar",
            Self::UnknownProperty => "unknown-property",
            Self::NoConverterForKind => "no-converter-for-kind",
            Self::InvalidValue => "invalid-value",
            Self::DanglingSubProperty => "dangling-sub-property",
            Self::MissingRequiredProperty => "missing-required-property",
            Self::UnknownTemplate => "unknown-template",
            Self::UnknownCommand => "unknown-command",
            Self::DuplicateParameter => "duplicate-parameter",
            Self::MalformedTable => "malformed-table",
            Self::DirectRecursionDetected => "direct-recursion-detected",
            Self::ExpansionDepthExceeded => "expansion-depth-exceeded",
            Self::UndefinedParameter => "undefined-parameter",
            Self::UnresolvedParameter => "unresolved-parameter",
            Self::MissingArgument => "missing-argument",
            Self::InvalidArgument => "invalid-argument",
            Self::VariableNotFound => "variable-not-found",
            Self::WrongVariableKind => "wrong-variable-kind",
            Self::Evaluation => "evaluation",
            Self::Rendering => "rendering",
            Self::Config => "config",
            Self::Io => "io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Byte range of a construct inside the text it was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// 1-based line number of the span start within `text`.
    pub fn line_in(&self, text: &str) -> usize {
        let end = self.start.min(text.len());
        text.as_bytes()[..end].iter().filter(|b| **b == b'\n').count() + 1
    }
}

/// Where a render failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Byte span of the outermost failing invocation.
    pub span: Span,
    /// 1-based line of the span start.
    pub line: usize,
}

impl Location {
    pub fn in_text(span: Span, text: &str) -> Self {
        Self { span, line: span.line_in(text) }
    }
}

/// Failure of a full render of one source text.
///
/// Template failures are located in the source text. Command failures are
/// located in the text produced by template expansion, which is the text
/// commands are dispatched on.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template expansion failed: {source}")]
    Expand {
        location: Option<Location>,
        #[source]
        source: ExpandError,
    },

    #[error("command failed: {source}")]
    Command {
        location: Option<Location>,
        #[source]
        source: CommandError,
    },
}

impl RenderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Expand { source, .. } => source.kind(),
            Self::Command { source, .. } => source.kind(),
        }
    }

    pub fn location(&self) -> Option<Location> {
        match self {
            Self::Expand { location, .. } | Self::Command { location, .. } => *location,
        }
    }

    pub fn span(&self) -> Option<Span> {
        self.location().map(|l| l.span)
    }

    pub fn line(&self) -> Option<usize> {
        self.location().map(|l| l.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_line_counts_preceding_newlines() {
        let text = "one\ntwo\nthree #x";
        let at = text.find('#').unwrap();
        assert_eq!(Span::new(at, at + 2).line_in(text), 3);
        assert_eq!(Span::new(0, 1).line_in(text), 1);
    }

    #[test]
    fn span_past_end_is_clamped() {
        assert_eq!(Span::new(100, 120).line_in("a\nb"), 2);
    }
}
