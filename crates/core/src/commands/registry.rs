use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use super::CommandError;
use crate::args::ArgMap;
use crate::metadata::parse_flag;
use crate::render::LabContext;

/// Handler function: receives the render context and the bound call, and
/// returns the text replacing the invocation.
pub type Handler = fn(&LabContext, &Call<'_>) -> Result<String, CommandError>;

/// A command together with its static manifest.
#[derive(Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    /// Declared parameter names, bound by index first, then by name.
    pub params: &'static [&'static str],
    /// Optional keywords with default text.
    pub keywords: &'static [(&'static str, &'static str)],
    pub summary: &'static str,
    handler: Handler,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("keywords", &self.keywords)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}({})", self.name, self.params.join(", "))?;
        for (key, default) in self.keywords {
            write!(f, " [{key}={default}]")?;
        }
        Ok(())
    }
}

impl Command {
    pub const fn new(name: &'static str, params: &'static [&'static str], handler: Handler) -> Self {
        Self { name, params, keywords: &[], summary: "", handler }
    }

    pub const fn with_keywords(mut self, keywords: &'static [(&'static str, &'static str)]) -> Self {
        self.keywords = keywords;
        self
    }

    pub const fn with_summary(mut self, summary: &'static str) -> Self {
        self.summary = summary;
        self
    }

    /// Bind call-site arguments to the manifest.
    ///
    /// Each declared parameter is looked up by its index, then by its name.
    /// Named arguments not consumed by a parameter are passed through as
    /// keywords; manifest keywords the caller omitted get their defaults.
    pub fn bind(&self, args: &ArgMap) -> Result<Call<'static>, CommandError> {
        let mut positional = Vec::with_capacity(self.params.len());
        let mut consumed = Vec::new();
        for (i, param) in self.params.iter().enumerate() {
            let value = match args.get_index(i) {
                Some(v) => v,
                None => {
                    let v = args.get_name(param).ok_or_else(|| CommandError::MissingArgument {
                        command: self.name.to_string(),
                        param: (*param).to_string(),
                    })?;
                    consumed.push(*param);
                    v
                }
            };
            positional.push(value.to_string());
        }

        let mut keywords: BTreeMap<String, String> = args
            .named()
            .filter(|(k, _)| !consumed.iter().any(|c| c == k))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for (key, default) in self.keywords {
            keywords.entry((*key).to_string()).or_insert_with(|| (*default).to_string());
        }

        Ok(Call { command: self.name, positional, keywords })
    }

    pub fn invoke(&self, ctx: &LabContext, args: &ArgMap) -> Result<String, CommandError> {
        let call = self.bind(args)?;
        debug!(
            command = self.name,
            positional = ?call.positional,
            keywords = ?call.keywords,
            "invoking command"
        );
        (self.handler)(ctx, &call)
    }
}

/// Arguments bound to a command's manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call<'c> {
    pub command: &'c str,
    pub positional: Vec<String>,
    pub keywords: BTreeMap<String, String>,
}

impl Call<'_> {
    /// The `i`-th declared parameter. Binding guarantees every declared
    /// parameter is present.
    pub fn arg(&self, i: usize) -> &str {
        self.positional.get(i).map_or("", String::as_str)
    }

    pub fn keyword(&self, name: &str) -> Option<&str> {
        self.keywords.get(name).map(String::as_str)
    }

    pub fn flag(&self, name: &str) -> bool {
        parse_flag(self.keyword(name))
    }

    /// Parse a keyword, falling back to `default` when absent.
    pub fn parse_keyword<T: FromStr>(&self, name: &str, default: T) -> Result<T, CommandError>
    where
        T::Err: fmt::Display,
    {
        match self.keyword(name) {
            None => Ok(default),
            Some(raw) => raw.trim().parse().map_err(|e: T::Err| CommandError::InvalidArgument {
                command: self.command.to_string(),
                param: name.to_string(),
                reason: format!("'{raw}': {e}"),
            }),
        }
    }
}

/// Commands by name.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in command.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for command in super::builtins::BUILTINS {
            registry.register(*command);
        }
        registry
    }

    pub fn register(&mut self, command: Command) -> Option<Command> {
        self.commands.insert(command.name, command)
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Bind `args` to the named command and run it.
    pub fn dispatch(
        &self,
        ctx: &LabContext,
        name: &str,
        args: &ArgMap,
    ) -> Result<String, CommandError> {
        let command = self
            .get(name)
            .ok_or_else(|| CommandError::UnknownCommand { name: name.to_string() })?;
        command.invoke(ctx, args)
    }
}
