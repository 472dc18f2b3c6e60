//! Converters from raw property text to typed values.

use std::collections::HashMap;

use super::property::ValueKind;
use super::value::{AxisRange, MetaValue};

/// Converts raw text into a value, or explains why it cannot.
pub type Converter = fn(&str) -> Result<MetaValue, String>;

/// Registry of converters keyed by value kind.
#[derive(Debug, Clone)]
pub struct Converters {
    by_kind: HashMap<ValueKind, Converter>,
}

impl Converters {
    /// An empty registry.
    pub fn empty() -> Self {
        Self { by_kind: HashMap::new() }
    }

    /// Number, string, list, range and boolean. Nested objects have no
    /// converter: they are built, not converted.
    pub fn standard() -> Self {
        let mut c = Self::empty();
        c.register(ValueKind::Number, convert_number);
        c.register(ValueKind::Str, convert_str);
        c.register(ValueKind::List, convert_list);
        c.register(ValueKind::Range, convert_range);
        c.register(ValueKind::Boolean, convert_bool);
        c
    }

    pub fn register(&mut self, kind: ValueKind, converter: Converter) {
        self.by_kind.insert(kind, converter);
    }

    pub fn get(&self, kind: ValueKind) -> Option<Converter> {
        self.by_kind.get(&kind).copied()
    }
}

impl Default for Converters {
    fn default() -> Self {
        Self::standard()
    }
}

pub fn convert_number(s: &str) -> Result<MetaValue, String> {
    let s = s.trim();
    s.parse::<f64>().map(MetaValue::Number).map_err(|_| format!("'{s}' is not a number"))
}

pub fn convert_str(s: &str) -> Result<MetaValue, String> {
    Ok(MetaValue::Str(s.trim().to_string()))
}

pub fn convert_list(s: &str) -> Result<MetaValue, String> {
    let items = s
        .split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect();
    Ok(MetaValue::List(items))
}

pub fn convert_range(s: &str) -> Result<MetaValue, String> {
    parse_range(s).map(MetaValue::Range)
}

pub fn convert_bool(s: &str) -> Result<MetaValue, String> {
    Ok(MetaValue::Boolean(parse_flag(Some(s))))
}

/// `autoscale` or `start;stop`.
pub fn parse_range(s: &str) -> Result<AxisRange, String> {
    let s = s.trim();
    if s == "autoscale" {
        return Ok(AxisRange::Auto);
    }

    let (start, stop) =
        s.split_once(';').ok_or_else(|| format!("'{s}' is not 'autoscale' or 'start;stop'"))?;
    let start = start.trim().parse::<f64>().map_err(|_| format!("bad range start in '{s}'"))?;
    let stop = stop.trim().parse::<f64>().map_err(|_| format!("bad range stop in '{s}'"))?;
    Ok(AxisRange::Fixed { start, stop })
}

/// False only for an absent value or `false`/`f`/`0` (any case).
pub fn parse_flag(s: Option<&str>) -> bool {
    match s {
        None => false,
        Some(v) => !matches!(v.trim().to_lowercase().as_str(), "false" | "f" | "0"),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(None, false)]
    #[case(Some("false"), false)]
    #[case(Some("FALSE"), false)]
    #[case(Some("f"), false)]
    #[case(Some("F"), false)]
    #[case(Some("0"), false)]
    #[case(Some(" 0 "), false)]
    #[case(Some("true"), true)]
    #[case(Some("yes"), true)]
    #[case(Some(""), true)]
    #[case(Some("no"), true)]
    fn flag_spellings(#[case] input: Option<&str>, #[case] expected: bool) {
        assert_eq!(parse_flag(input), expected);
    }

    #[test]
    fn list_drops_empty_tokens() {
        assert_eq!(
            convert_list(" t ;; v;").unwrap(),
            MetaValue::List(vec!["t".into(), "v".into()])
        );
    }

    #[test]
    fn number_parses_decimal() {
        assert_eq!(convert_number(" 2.5 ").unwrap(), MetaValue::Number(2.5));
        assert!(convert_number("two").is_err());
    }

    #[test]
    fn string_is_trimmed() {
        assert_eq!(convert_str("  red ").unwrap(), MetaValue::Str("red".into()));
    }

    #[test]
    fn range_forms() {
        assert_eq!(parse_range("autoscale").unwrap(), AxisRange::Auto);
        assert_eq!(
            parse_range("0; 10.5").unwrap(),
            AxisRange::Fixed { start: 0.0, stop: 10.5 }
        );
        assert!(parse_range("0").is_err());
        assert!(parse_range("a;b").is_err());
    }

    #[test]
    fn standard_registry_has_no_object_converter() {
        let c = Converters::standard();
        assert!(c.get(ValueKind::Object).is_none());
        assert!(c.get(ValueKind::Boolean).is_some());
    }
}
