//! Typed metadata values.

use std::collections::BTreeMap;
use std::fmt;

use super::property::EntityKind;

/// Axis range: either autoscaled or a fixed `start;stop` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisRange {
    Auto,
    Fixed { start: f64, stop: f64 },
}

impl AxisRange {
    pub fn contains(&self, v: f64) -> bool {
        match *self {
            Self::Auto => true,
            Self::Fixed { start, stop } => {
                let (lo, hi) = if start <= stop { (start, stop) } else { (stop, start) };
                v >= lo && v <= hi
            }
        }
    }
}

impl fmt::Display for AxisRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("autoscale"),
            Self::Fixed { start, stop } => write!(f, "{start};{stop}"),
        }
    }
}

/// A finalized nested object, e.g. a plot's curve.
#[derive(Debug, Clone, PartialEq)]
pub struct SubObject {
    pub kind: EntityKind,
    pub title: String,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Number(f64),
    Str(String),
    List(Vec<String>),
    Range(AxisRange),
    Boolean(bool),
    Object(SubObject),
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::List(items) => write!(f, "[{}]", items.join(", ")),
            Self::Range(r) => write!(f, "{r}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Object(o) => write!(f, "{}<{}> {}", o.kind, o.title, o.metadata),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetaEntry {
    Single(MetaValue),
    Multi(Vec<MetaValue>),
}

impl MetaEntry {
    /// The value of a single entry, or the last value of a multi entry.
    pub fn value(&self) -> Option<&MetaValue> {
        match self {
            Self::Single(v) => Some(v),
            Self::Multi(vs) => vs.last(),
        }
    }

    pub fn values(&self) -> &[MetaValue] {
        match self {
            Self::Single(v) => std::slice::from_ref(v),
            Self::Multi(vs) => vs,
        }
    }
}

/// Property name to typed value(s).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    entries: BTreeMap<String, MetaEntry>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn entry(&self, name: &str) -> Option<&MetaEntry> {
        self.entries.get(name)
    }

    /// Overwrite a single-valued property.
    pub fn set(&mut self, name: &str, value: MetaValue) {
        self.entries.insert(name.to_string(), MetaEntry::Single(value));
    }

    /// Append to a multi-valued property.
    pub fn push(&mut self, name: &str, value: MetaValue) {
        match self.entries.get_mut(name) {
            Some(MetaEntry::Multi(values)) => values.push(value),
            _ => {
                self.entries.insert(name.to_string(), MetaEntry::Multi(vec![value]));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&MetaValue> {
        self.entries.get(name).and_then(MetaEntry::value)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            MetaValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn get_number(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            MetaValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn get_list(&self, name: &str) -> Option<&[String]> {
        match self.get(name)? {
            MetaValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn get_range(&self, name: &str) -> Option<AxisRange> {
        match self.get(name)? {
            MetaValue::Range(r) => Some(*r),
            _ => None,
        }
    }

    /// Nested objects stored under `name`, in encounter order.
    pub fn objects<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a SubObject> + 'a {
        self.entries
            .get(name)
            .map(MetaEntry::values)
            .unwrap_or_default()
            .iter()
            .filter_map(|v| match v {
                MetaValue::Object(o) => Some(o),
                _ => None,
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, entry)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            match entry {
                MetaEntry::Single(v) => write!(f, "{name}={v}")?,
                MetaEntry::Multi(vs) => {
                    let items: Vec<String> = vs.iter().map(ToString::to_string).collect();
                    write!(f, "{name}=[{}]", items.join(", "))?;
                }
            }
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_appends_in_order() {
        let mut md = Metadata::new();
        md.push("tag", MetaValue::Str("a".into()));
        md.push("tag", MetaValue::Str("b".into()));
        let values = md.entry("tag").unwrap().values();
        assert_eq!(values, &[MetaValue::Str("a".into()), MetaValue::Str("b".into())]);
    }

    #[test]
    fn set_overwrites() {
        let mut md = Metadata::new();
        md.set("n", MetaValue::Number(1.0));
        md.set("n", MetaValue::Number(2.0));
        assert_eq!(md.get_number("n"), Some(2.0));
    }

    #[test]
    fn typed_getters_reject_other_kinds() {
        let mut md = Metadata::new();
        md.set("n", MetaValue::Number(1.0));
        assert_eq!(md.get_str("n"), None);
        assert_eq!(md.get_list("missing"), None);
        assert_eq!(md.objects("missing").count(), 0);
    }

    #[test]
    fn fixed_range_contains_either_orientation() {
        let r = AxisRange::Fixed { start: 5.0, stop: 1.0 };
        assert!(r.contains(3.0));
        assert!(!r.contains(6.0));
        assert!(AxisRange::Auto.contains(f64::MAX));
    }
}
