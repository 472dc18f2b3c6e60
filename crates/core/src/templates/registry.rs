use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::TemplateError;
use super::template::Template;
use crate::grammar::DefinitionGrammar;

/// Named templates, cached for the lifetime of a render context.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, Template>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template, replacing any previous one with the same name.
    pub fn insert(&mut self, template: Template) -> Option<Template> {
        let previous = self.templates.insert(template.name.clone(), template);
        if let Some(ref prev) = previous {
            warn!(template = %prev.name, "template redefined");
        }
        previous
    }

    /// Parse every template block in `text`. Returns the number of
    /// templates defined.
    pub fn load_source(
        &mut self,
        text: &str,
        grammar: &DefinitionGrammar,
    ) -> Result<usize, TemplateError> {
        let mut count = 0;
        for def in grammar.find_all(text) {
            let template = Template::parse(def.name, def.title, def.body)?;
            debug!(
                template = %template.name,
                required = ?template.required_params().map(|p| &p.name).collect::<Vec<_>>(),
                optional = ?template
                    .optional_params()
                    .map(|p| (&p.name, p.default.as_deref().unwrap_or_default()))
                    .collect::<Vec<_>>(),
                "defining template"
            );
            self.insert(template);
            count += 1;
        }
        Ok(count)
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Templates in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grammar() -> DefinitionGrammar {
        DefinitionGrammar::new("##", "##").unwrap()
    }

    #[test]
    fn loads_all_blocks_with_titles() {
        let mut reg = TemplateRegistry::new();
        let n = reg
            .load_source("##a \\ First\nA\n##\nnoise\n##b\n++x\nB %%x\n##\n", &grammar())
            .unwrap();

        assert_eq!(n, 2);
        assert_eq!(reg.get("a").unwrap().title.as_deref(), Some("First"));
        assert_eq!(reg.get("a").unwrap().body, "A");
        assert_eq!(reg.get("b").unwrap().params().len(), 1);
        let names: Vec<_> = reg.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn later_definition_wins() {
        let mut reg = TemplateRegistry::new();
        reg.load_source("##a\nold\n##", &grammar()).unwrap();
        reg.load_source("##a\nnew\n##", &grammar()).unwrap();
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("a").unwrap().body, "new");
    }

    #[test]
    fn parse_failure_propagates() {
        let mut reg = TemplateRegistry::new();
        assert!(reg.load_source("##a\n++x\n++x\n##", &grammar()).is_err());
        assert!(!reg.contains("a"));
    }
}
