//! The render context and the two-stage render pipeline.
//!
//! A [`LabContext`] owns everything a render reads: the syntax, template
//! and command registries, the variable store, expansion limits and the
//! expression/plot collaborators. Sources are loaded into it first; after
//! that a render only needs `&self`.
//!
//! Rendering runs template expansion over the whole text, then dispatches
//! the command invocations left in the result.

use std::fmt;

use tracing::info;

use crate::args::parse_args;
use crate::commands::{CommandError, CommandRegistry};
use crate::error::{Location, RenderError};
use crate::grammar::{GrammarError, Syntax};
use crate::metadata::Converters;
use crate::plotting::{DisabledRenderer, PlotRenderer};
use crate::scripting::{ExpressionEvaluator, LuaEvaluator};
use crate::templates::{DEFAULT_MAX_DEPTH, Expander, TemplateError, TemplateRegistry};
use crate::variables::{StoreError, VariableStore};

/// Bounds applied while rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of nested template expansions.
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH }
    }
}

pub struct LabContext {
    syntax: Syntax,
    converters: Converters,
    templates: TemplateRegistry,
    commands: CommandRegistry,
    store: VariableStore,
    limits: Limits,
    evaluator: Box<dyn ExpressionEvaluator>,
    renderer: Box<dyn PlotRenderer>,
}

impl fmt::Debug for LabContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabContext")
            .field("templates", &self.templates.len())
            .field("commands", &self.commands.len())
            .field("variables", &self.store.len())
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl LabContext {
    /// Standard syntax and converters, built-in commands, the Lua
    /// evaluator and no plot backend.
    pub fn new() -> Result<Self, GrammarError> {
        Ok(Self::with_syntax(Syntax::standard()?))
    }

    pub fn with_syntax(syntax: Syntax) -> Self {
        Self {
            syntax,
            converters: Converters::standard(),
            templates: TemplateRegistry::new(),
            commands: CommandRegistry::with_builtins(),
            store: VariableStore::new(),
            limits: Limits::default(),
            evaluator: Box::new(LuaEvaluator::sandboxed()),
            renderer: Box::new(DisabledRenderer),
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_evaluator(mut self, evaluator: Box<dyn ExpressionEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn with_renderer(mut self, renderer: Box<dyn PlotRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_converters(mut self, converters: Converters) -> Self {
        self.converters = converters;
        self
    }

    /// Parse the template blocks of a template source.
    pub fn load_templates(&mut self, text: &str) -> Result<usize, TemplateError> {
        self.templates.load_source(text, &self.syntax.template_definition)
    }

    /// Parse the table and plot blocks of a data source.
    pub fn load_data(&mut self, text: &str) -> Result<usize, StoreError> {
        self.store.load_source(text, &self.syntax, &self.converters)
    }

    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn commands_mut(&mut self) -> &mut CommandRegistry {
        &mut self.commands
    }

    pub fn store(&self) -> &VariableStore {
        &self.store
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn evaluator(&self) -> &dyn ExpressionEvaluator {
        self.evaluator.as_ref()
    }

    pub fn renderer(&self) -> &dyn PlotRenderer {
        self.renderer.as_ref()
    }

    /// Stage one: resolve every template invocation.
    pub fn expand_templates(&self, text: &str) -> Result<String, RenderError> {
        Expander::new(&self.templates, &self.syntax.template_invocation)
            .with_max_depth(self.limits.max_depth)
            .expand_located(text)
            .map_err(|(source, span)| RenderError::Expand {
                location: Some(Location::in_text(span, text)),
                source,
            })
    }

    /// Stage two: replace every command invocation with its output.
    pub fn invoke_commands(&self, text: &str) -> Result<String, RenderError> {
        self.syntax
            .command_invocation
            .try_replace(text, |site| {
                let args = parse_args(site.args.unwrap_or(""));
                self.commands.dispatch(self, site.name, &args).map_err(|e| (e, site.span))
            })
            .map_err(|(source, span): (CommandError, _)| RenderError::Command {
                location: Some(Location::in_text(span, text)),
                source,
            })
    }

    /// Expand templates, then invoke commands. Any failure aborts the
    /// whole render.
    pub fn render(&self, text: &str) -> Result<String, RenderError> {
        info!("render stage 1: resolve templates");
        let expanded = self.expand_templates(text)?;
        info!("render stage 2: invoke commands");
        self.invoke_commands(&expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn ctx() -> LabContext {
        let mut ctx = LabContext::new().unwrap();
        ctx.load_templates("##cap\n++t\n\\caption{@table_caption||%%t||}\n##").unwrap();
        ctx.load_data("^^t1 \\ Results\ncols=a;b\n1 2\n^^").unwrap();
        ctx
    }

    #[test]
    fn templates_then_commands() {
        let out = ctx().render("#cap||t1|| and @table_label||t1||").unwrap();
        assert_eq!(out, "\\caption{Results} and tab:t1");
    }

    #[test]
    fn template_failure_has_source_line() {
        let err = ctx().render("line one\nline two #nope").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownTemplate);
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn command_failure_aborts_render() {
        let err = ctx().render("ok\n@nope||x||").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownCommand);
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn depth_limit_comes_from_limits() {
        let mut ctx = LabContext::new().unwrap().with_limits(Limits { max_depth: 2 });
        ctx.load_templates("##a\n#b\n##\n##b\n#c\n##\n##c\nC\n##").unwrap();
        let err = ctx.render("#a").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExpansionDepthExceeded);
    }

    #[test]
    fn extra_commands_can_be_registered() {
        use crate::commands::Command;

        let mut ctx = ctx();
        ctx.commands_mut()
            .register(Command::new("shout", &["text"], |_, call| Ok(call.arg(0).to_uppercase())));
        assert_eq!(ctx.render("@shout||hello||").unwrap(), "HELLO");
    }

    #[test]
    fn converters_are_replaceable() {
        use crate::metadata::{MetaValue, ValueKind};

        fn comma_list(s: &str) -> Result<MetaValue, String> {
            Ok(MetaValue::List(s.split(',').map(|c| c.trim().to_string()).collect()))
        }

        let mut converters = Converters::standard();
        converters.register(ValueKind::List, comma_list);
        let mut ctx = LabContext::new().unwrap().with_converters(converters);
        ctx.load_data("^^t\ncols=a, b\n1 2\n^^").unwrap();
        assert_eq!(ctx.store().table("t").unwrap().columns(), ["a", "b"]);

        let mut bare = LabContext::new().unwrap().with_converters(Converters::empty());
        let err = bare.load_data("^^t\ncols=a\n1\n^^").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoConverterForKind);
    }
}
