//! A single parameterized template.
//!
//! Template bodies may start with declaration lines:
//!
//! ```text
//! ++title            required parameter
//! ++width=0.8        optional parameter with a default
//! @@wrap-newlines    option flag
//! ```
//!
//! Parameters are numbered in declaration order, starting at 0. The rest of
//! the lines form the body, where `%%name` placeholders are replaced at
//! interpolation time.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::warn;

use super::TemplateError;
use super::expander::ExpandError;
use crate::args::{ArgKey, ArgMap};

pub const PARAM_MARKER: &str = "++";
pub const OPTION_MARKER: &str = "@@";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%%(\w+)").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub position: usize,
    /// `None` means the parameter is required.
    pub default: Option<String>,
}

impl Parameter {
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateOptions {
    /// Surround the expansion with a newline on each side.
    pub wrap_newlines: bool,
}

impl TemplateOptions {
    fn apply(&mut self, flag: &str, template: &str) {
        match flag {
            "wrap-newlines" => self.wrap_newlines = true,
            other => warn!(template, option = other, "ignoring unknown template option"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub title: Option<String>,
    pub body: String,
    params: Vec<Parameter>,
    /// Defaults keyed both by parameter name and by position.
    defaults: ArgMap,
    pub options: TemplateOptions,
}

impl Template {
    /// Parse a template definition body.
    pub fn parse(name: &str, title: Option<&str>, source: &str) -> Result<Self, TemplateError> {
        let mut params: Vec<Parameter> = Vec::new();
        let mut options = TemplateOptions::default();
        let mut body_lines = Vec::new();

        for line in source.lines() {
            if let Some(flag) = line.strip_prefix(OPTION_MARKER) {
                options.apply(flag.trim(), name);
            } else if let Some(decl) = line.strip_prefix(PARAM_MARKER) {
                let param = parse_parameter(decl, params.len());
                if params.iter().any(|p| p.name == param.name) {
                    return Err(TemplateError::DuplicateParameter {
                        template: name.to_string(),
                        param: param.name,
                    });
                }
                params.push(param);
            } else {
                body_lines.push(line);
            }
        }

        let first = body_lines.iter().position(|l| !l.trim().is_empty());
        let last = body_lines.iter().rposition(|l| !l.trim().is_empty());
        let body = match (first, last) {
            (Some(first), Some(last)) => body_lines[first..=last].join("\n"),
            _ => String::new(),
        };

        let mut defaults = ArgMap::new();
        for p in &params {
            if let Some(ref d) = p.default {
                defaults.insert_name(p.name.clone(), d.clone());
                defaults.insert_index(p.position, d.clone());
            }
        }

        Ok(Self {
            name: name.to_string(),
            title: title.map(ToString::to_string),
            body,
            params,
            defaults,
            options,
        })
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn required_params(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter().filter(|p| p.is_required())
    }

    pub fn optional_params(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter().filter(|p| !p.is_required())
    }

    /// Replace every `%%name` placeholder of the body.
    ///
    /// Each value is looked up, in order, in the call-site arguments by name
    /// and by position, then in the template defaults by name and by
    /// position.
    pub fn interpolate(&self, args: &ArgMap) -> Result<String, ExpandError> {
        let mut failure = None;

        let replaced = PLACEHOLDER.replace_all(&self.body, |caps: &Captures<'_>| {
            if failure.is_some() {
                return String::new();
            }
            match self.resolve(&caps[1], args) {
                Ok(value) => value.to_string(),
                Err(e) => {
                    failure = Some(e);
                    String::new()
                }
            }
        });

        if let Some(e) = failure {
            return Err(e);
        }

        let text = replaced.into_owned();
        if self.options.wrap_newlines { Ok(format!("\n{text}\n")) } else { Ok(text) }
    }

    fn resolve<'a>(&'a self, name: &str, args: &'a ArgMap) -> Result<&'a str, ExpandError> {
        let param = self.param(name).ok_or_else(|| ExpandError::UndefinedParameter {
            template: self.name.clone(),
            param: name.to_string(),
        })?;

        let keys = [ArgKey::Name(param.name.clone()), ArgKey::Index(param.position)];
        for source in [args, &self.defaults] {
            for key in &keys {
                if let Some(value) = source.get(key) {
                    return Ok(value);
                }
            }
        }

        Err(ExpandError::UnresolvedParameter {
            template: self.name.clone(),
            param: name.to_string(),
        })
    }
}

/// `name` or `name=default`. A default is trimmed unless that leaves it
/// empty, in which case the raw text is kept.
fn parse_parameter(decl: &str, position: usize) -> Parameter {
    let (name, default) = match decl.split_once('=') {
        Some((name, raw)) => {
            let trimmed = raw.trim();
            let default = if trimmed.is_empty() { raw } else { trimmed };
            (name, Some(default.to_string()))
        }
        None => (decl, None),
    };
    Parameter { name: name.trim().to_string(), position, default }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::parse_args;
    use crate::error::ErrorKind;

    fn tpl(source: &str) -> Template {
        Template::parse("t", None, source).unwrap()
    }

    #[test]
    fn parses_parameters_in_declaration_order() {
        let t = tpl("++title\n++width=0.8\n++sep= \nbody");

        let params = t.params();
        assert_eq!(params.len(), 3);
        assert_eq!(params[0], Parameter { name: "title".into(), position: 0, default: None });
        assert_eq!(params[1].default.as_deref(), Some("0.8"));
        assert_eq!(params[1].position, 1);
        assert_eq!(params[2].default.as_deref(), Some(" "));
        assert_eq!(t.body, "body");
        assert_eq!(t.required_params().count(), 1);
        assert_eq!(t.optional_params().count(), 2);
    }

    #[test]
    fn strips_outer_blank_lines_but_keeps_inner_ones() {
        let t = tpl("\n++a\n\nfirst\n\nsecond\n\n");
        assert_eq!(t.body, "first\n\nsecond");
    }

    #[test]
    fn duplicate_parameter_is_rejected() {
        let err = Template::parse("t", None, "++a\n++a=1\nx").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateParameter);
    }

    #[test]
    fn by_name_and_by_position_agree() {
        let t = tpl("++a\n++b\n++c\n%%a-%%b-%%c");
        let by_name = t.interpolate(&parse_args("a=1|b=2|c=3")).unwrap();
        let by_position = t.interpolate(&parse_args("1|2|3")).unwrap();
        assert_eq!(by_name, "1-2-3");
        assert_eq!(by_name, by_position);
    }

    #[test]
    fn call_site_beats_default() {
        let t = tpl("++w=0.8\n[%%w]");
        assert_eq!(t.interpolate(&ArgMap::new()).unwrap(), "[0.8]");
        assert_eq!(t.interpolate(&parse_args("0.5")).unwrap(), "[0.5]");
        assert_eq!(t.interpolate(&parse_args("w=0.3")).unwrap(), "[0.3]");
    }

    #[test]
    fn name_lookup_precedes_position_lookup() {
        let t = tpl("++a\n++b\n%%a/%%b");
        // position 0 carries "x" but `a` is also given by name
        let out = t.interpolate(&parse_args("x|a=named|b=2")).unwrap();
        assert_eq!(out, "named/2");
    }

    #[test]
    fn omitted_required_parameter_is_unresolved() {
        let t = tpl("++title\nHello %%title");
        let err = t.interpolate(&ArgMap::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnresolvedParameter);
    }

    #[test]
    fn undeclared_placeholder_is_undefined() {
        let t = tpl("++a\n%%a %%b");
        let err = t.interpolate(&parse_args("1")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UndefinedParameter);
    }

    #[test]
    fn bare_percent_pair_is_literal() {
        let t = tpl("100%% sure");
        assert_eq!(t.interpolate(&ArgMap::new()).unwrap(), "100%% sure");
    }

    #[test]
    fn plain_body_is_unchanged() {
        let t = tpl("\\section{Intro}\nText.");
        assert_eq!(t.interpolate(&ArgMap::new()).unwrap(), "\\section{Intro}\nText.");
    }

    #[test]
    fn wrap_newlines_pads_the_body() {
        let t = tpl("@@wrap-newlines\n\\section{Intro}");
        assert!(t.options.wrap_newlines);
        assert_eq!(t.interpolate(&ArgMap::new()).unwrap(), "\n\\section{Intro}\n");
    }

    #[test]
    fn unknown_option_is_ignored() {
        let t = tpl("@@shiny\nx");
        assert_eq!(t.options, TemplateOptions::default());
        assert_eq!(t.body, "x");
    }
}
