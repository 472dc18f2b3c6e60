//! Call-site argument lists: `a|b|key=val|...`.
//!
//! Each item is either named (`key=value`) or positional. Positional items
//! are keyed by the index of the item in the list, so the counter advances
//! over named items as well: `a|k=v|b` binds `a` to 0 and `b` to 2.
//! Zero-length items (`a||b` outside an invocation, or a trailing `|`) are
//! dropped and do not consume an index.

use std::collections::BTreeMap;
use std::fmt;

/// Key of an argument: its position or its name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArgKey {
    Index(usize),
    Name(String),
}

impl fmt::Display for ArgKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Name(n) => f.write_str(n),
        }
    }
}

/// Unified positional/named argument map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgMap {
    entries: BTreeMap<ArgKey, String>,
}

impl ArgMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: ArgKey, value: impl Into<String>) {
        self.entries.insert(key, value.into());
    }

    pub fn insert_index(&mut self, index: usize, value: impl Into<String>) {
        self.insert(ArgKey::Index(index), value);
    }

    pub fn insert_name(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.insert(ArgKey::Name(name.into()), value);
    }

    pub fn get(&self, key: &ArgKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn get_index(&self, index: usize) -> Option<&str> {
        self.get(&ArgKey::Index(index))
    }

    pub fn get_name(&self, name: &str) -> Option<&str> {
        self.get(&ArgKey::Name(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ArgKey, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Named entries only, in key order.
    pub fn named(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|(k, v)| match k {
            ArgKey::Name(n) => Some((n.as_str(), v.as_str())),
            ArgKey::Index(_) => None,
        })
    }
}

impl fmt::Display for ArgMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}: {v:?}")?;
        }
        f.write_str("}")
    }
}

/// Parse an argument list, trimming values.
pub fn parse_args(text: &str) -> ArgMap {
    parse_args_with(text, true)
}

/// Parse an argument list; `trim` controls whether values are trimmed.
///
/// Keys are always trimmed. An item whose text before the first `=` is not
/// a non-empty run of word characters is positional as a whole.
pub fn parse_args_with(text: &str, trim: bool) -> ArgMap {
    let mut args = ArgMap::new();
    let mut position = 0;

    for item in text.split('|') {
        if item.is_empty() {
            continue;
        }

        match split_named(item) {
            Some((key, value)) => {
                args.insert_name(key, clean(value, trim));
            }
            None => {
                args.insert_index(position, clean(item, trim));
            }
        }
        position += 1;
    }

    args
}

fn split_named(item: &str) -> Option<(&str, &str)> {
    let (key, value) = item.split_once('=')?;
    let key = key.trim();
    if !key.is_empty() && key.chars().all(is_word_char) {
        Some((key, value))
    } else {
        None
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn clean(value: &str, trim: bool) -> String {
    if trim { value.trim().to_string() } else { value.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_and_named() {
        let args = parse_args("t1 | precision = 5 | x");
        assert_eq!(args.get_index(0), Some("t1"));
        assert_eq!(args.get_name("precision"), Some("5"));
        assert_eq!(args.get_index(2), Some("x"));
        assert_eq!(args.get_index(1), None);
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn trimming_can_be_disabled() {
        let args = parse_args_with(" a | k= v ", false);
        assert_eq!(args.get_index(0), Some(" a "));
        assert_eq!(args.get_name("k"), Some(" v "));
    }

    #[test]
    fn empty_items_are_dropped_without_consuming_an_index() {
        let args = parse_args("a||b|");
        assert_eq!(args.get_index(0), Some("a"));
        assert_eq!(args.get_index(1), Some("b"));
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn whitespace_only_item_is_an_empty_value() {
        let args = parse_args("a| |b");
        assert_eq!(args.get_index(1), Some(""));
        assert_eq!(args.get_index(2), Some("b"));
    }

    #[test]
    fn value_may_contain_equals_sign() {
        let args = parse_args("expr=a=b");
        assert_eq!(args.get_name("expr"), Some("a=b"));
    }

    #[test]
    fn non_identifier_key_makes_item_positional() {
        let args = parse_args("x + y = 3|=v");
        assert_eq!(args.get_index(0), Some("x + y = 3"));
        assert_eq!(args.get_index(1), Some("=v"));
    }

    #[test]
    fn empty_named_value_is_kept() {
        let args = parse_args("sep=");
        assert_eq!(args.get_name("sep"), Some(""));
    }

    #[test]
    fn later_duplicate_overwrites() {
        let args = parse_args("k=1|k=2");
        assert_eq!(args.get_name("k"), Some("2"));
    }

    #[test]
    fn display_lists_entries() {
        let args = parse_args("a|k=v");
        assert_eq!(args.to_string(), r#"{0: "a", k: "v"}"#);
    }

    #[test]
    fn empty_text_gives_empty_map() {
        assert!(parse_args("").is_empty());
    }
}
