//! Matchers for invocation sites and block definitions.
//!
//! Two families of patterns are compiled from trigger strings:
//!
//! - invocations: `<trigger><name>` optionally followed by
//!   `<open><args><close>`, e.g. `#frame||Title|wide=1||` or `@date`
//! - block definitions: `<trigger><name>[\title]` + newline + body + closing
//!   trigger, e.g. `##frame \ A framed box` ... `##`
//!
//! Trigger strings are escaped before compilation, so they are matched
//! literally.

use regex::{Captures, Regex};
use thiserror::Error;

use crate::error::{ErrorKind, Span};

#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("invalid pattern for trigger '{trigger}': {message}")]
    Regex { trigger: String, message: String },
}

impl GrammarError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Grammar
    }
}

/// A single invocation site found in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<'t> {
    pub name: &'t str,
    /// Raw argument text between the delimiters, if any were given.
    pub args: Option<&'t str>,
    pub span: Span,
}

/// A single block definition found in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition<'t> {
    pub name: &'t str,
    /// Inline comment after the `\` marker, used as human-readable title.
    pub title: Option<&'t str>,
    pub body: &'t str,
    pub span: Span,
}

/// Matcher for `<trigger><name>[<open><args><close>]`.
#[derive(Debug, Clone)]
pub struct InvocationGrammar {
    trigger: String,
    re: Regex,
}

impl InvocationGrammar {
    pub fn new(trigger: &str, open: &str, close: &str) -> Result<Self, GrammarError> {
        let pattern = format!(
            r"(?s){}(\w+)(?:\s*{}(.*?){})?",
            regex::escape(trigger),
            regex::escape(open),
            regex::escape(close)
        );
        let re = compile(trigger, &pattern)?;
        Ok(Self { trigger: trigger.to_string(), re })
    }

    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    /// All invocations in `text`, left to right, non-overlapping.
    pub fn find_all<'t>(&self, text: &'t str) -> Vec<Invocation<'t>> {
        self.re.captures_iter(text).map(|caps| invocation_from(&caps)).collect()
    }

    /// Replace every invocation with the output of `f`, stopping at the
    /// first error.
    pub fn try_replace<E, F>(&self, text: &str, mut f: F) -> Result<String, E>
    where
        F: FnMut(&Invocation<'_>) -> Result<String, E>,
    {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for caps in self.re.captures_iter(text) {
            let site = invocation_from(&caps);
            out.push_str(&text[last..site.span.start]);
            out.push_str(&f(&site)?);
            last = site.span.end;
        }
        out.push_str(&text[last..]);
        Ok(out)
    }
}

fn invocation_from<'t>(caps: &Captures<'t>) -> Invocation<'t> {
    let whole = caps.get(0).map_or(0..0, |m| m.range());
    Invocation {
        name: caps.get(1).map_or("", |m| m.as_str()),
        args: caps.get(2).map(|m| m.as_str()),
        span: Span::new(whole.start, whole.end),
    }
}

/// Matcher for `<trigger><name>[\title]` + newline + body + `<closing>`.
#[derive(Debug, Clone)]
pub struct DefinitionGrammar {
    trigger: String,
    re: Regex,
}

impl DefinitionGrammar {
    pub fn new(trigger: &str, closing: &str) -> Result<Self, GrammarError> {
        // The title is only captured when the backslash marker is present;
        // the header line always ends at the first line break.
        let pattern = format!(
            r"(?ms){}[ \t]*(\w+)[ \t]*(?:\\[ \t]*([^\r\n]*?))?[ \t]*\r?$(.*?){}",
            regex::escape(trigger),
            regex::escape(closing)
        );
        let re = compile(trigger, &pattern)?;
        Ok(Self { trigger: trigger.to_string(), re })
    }

    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    pub fn find_all<'t>(&self, text: &'t str) -> Vec<Definition<'t>> {
        self.re
            .captures_iter(text)
            .map(|caps| {
                let whole = caps.get(0).map_or(0..0, |m| m.range());
                Definition {
                    name: caps.get(1).map_or("", |m| m.as_str()),
                    title: caps.get(2).map(|m| m.as_str()),
                    body: caps.get(3).map_or("", |m| m.as_str()),
                    span: Span::new(whole.start, whole.end),
                }
            })
            .collect()
    }
}

fn compile(trigger: &str, pattern: &str) -> Result<Regex, GrammarError> {
    Regex::new(pattern).map_err(|e| GrammarError::Regex {
        trigger: trigger.to_string(),
        message: e.to_string(),
    })
}

/// The complete set of matchers used by the renderer.
#[derive(Debug, Clone)]
pub struct Syntax {
    pub template_invocation: InvocationGrammar,
    pub command_invocation: InvocationGrammar,
    pub template_definition: DefinitionGrammar,
    pub plot_definition: DefinitionGrammar,
    pub table_definition: DefinitionGrammar,
}

impl Syntax {
    /// `#tpl||..||`, `@cmd||..||`, `##tpl..##`, `$$plot..$$`, `^^table..^^`.
    pub fn standard() -> Result<Self, GrammarError> {
        Ok(Self {
            template_invocation: InvocationGrammar::new("#", "||", "||")?,
            command_invocation: InvocationGrammar::new("@", "||", "||")?,
            template_definition: DefinitionGrammar::new("##", "##")?,
            plot_definition: DefinitionGrammar::new("$$", "$$")?,
            table_definition: DefinitionGrammar::new("^^", "^^")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_invocations_with_and_without_args() {
        let g = InvocationGrammar::new("#", "||", "||").unwrap();
        let text = "see #intro and #frame||A|b=2|| done";
        let found = g.find_all(text);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "intro");
        assert_eq!(found[0].args, None);
        assert_eq!(found[1].name, "frame");
        assert_eq!(found[1].args, Some("A|b=2"));
        assert_eq!(&text[found[1].span.start..found[1].span.end], "#frame||A|b=2||");
    }

    #[test]
    fn allows_whitespace_before_args_and_multiline_args() {
        let g = InvocationGrammar::new("@", "||", "||").unwrap();
        let found = g.find_all("@table  ||t1|\nprecision=2||");
        assert_eq!(found[0].name, "table");
        assert_eq!(found[0].args, Some("t1|\nprecision=2"));
    }

    #[test]
    fn args_stop_at_first_closer() {
        let g = InvocationGrammar::new("#", "||", "||").unwrap();
        let found = g.find_all("#a||x|| #b||y||");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].args, Some("x"));
        assert_eq!(found[1].args, Some("y"));
    }

    #[test]
    fn try_replace_splices_outputs() {
        let g = InvocationGrammar::new("@", "||", "||").unwrap();
        let out: Result<String, ()> =
            g.try_replace("a @x b @y||1|| c", |site| Ok(site.name.to_uppercase()));
        assert_eq!(out.unwrap(), "a X b Y c");
    }

    #[test]
    fn try_replace_stops_on_error() {
        let g = InvocationGrammar::new("@", "||", "||").unwrap();
        let out: Result<String, String> = g.try_replace("@ok @bad @never", |site| {
            if site.name == "bad" { Err(site.name.to_string()) } else { Ok(String::new()) }
        });
        assert_eq!(out.unwrap_err(), "bad");
    }

    #[test]
    fn definition_with_title() {
        let g = DefinitionGrammar::new("##", "##").unwrap();
        let text = "##frame \\ A framed box\n++title\n\\fbox{%%title}\n##";
        let defs = g.find_all(text);

        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "frame");
        assert_eq!(defs[0].title, Some("A framed box"));
        assert_eq!(defs[0].body, "\n++title\n\\fbox{%%title}\n");
    }

    #[test]
    fn definition_without_title_marker_has_no_title() {
        let g = DefinitionGrammar::new("$$", "$$").unwrap();
        let defs = g.find_all("$$p1\naxes=t;v\n$$\n$$p2 \\ Second\ncurve=c\n$$");

        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].name, "p1");
        assert_eq!(defs[0].title, None);
        assert_eq!(defs[0].body, "\naxes=t;v\n");
        assert_eq!(defs[1].title, Some("Second"));
    }

    #[test]
    fn standard_syntax_compiles() {
        let syntax = Syntax::standard().unwrap();
        assert_eq!(syntax.template_invocation.trigger(), "#");
        assert_eq!(syntax.table_definition.trigger(), "^^");
    }
}
