//! Static property descriptors for every entity kind.

use std::fmt;

/// Declared value kind of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Number,
    Str,
    List,
    Range,
    Boolean,
    /// Introduces a nested sub-object built from `.key=value` lines.
    Object,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Str => "string",
            Self::List => "list",
            Self::Range => "range",
            Self::Boolean => "boolean",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Single,
    Multi,
}

/// Entities whose metadata is described by a [`PropertySet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Table,
    Plot,
    Curve,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Plot => "plot",
            Self::Curve => "curve",
        }
    }

    pub fn properties(self) -> &'static PropertySet {
        match self {
            Self::Table => &TABLE_PROPERTIES,
            Self::Plot => &PLOT_PROPERTIES,
            Self::Curve => &CURVE_PROPERTIES,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property {
    pub name: &'static str,
    pub kind: ValueKind,
    /// Default text, converted with the kind's converter when absent.
    pub default: Option<&'static str>,
    pub cardinality: Cardinality,
    /// Entity built for [`ValueKind::Object`] properties.
    pub object: Option<EntityKind>,
}

impl Property {
    pub const fn required(name: &'static str, kind: ValueKind) -> Self {
        Self { name, kind, default: None, cardinality: Cardinality::Single, object: None }
    }

    pub const fn with_default(
        name: &'static str,
        kind: ValueKind,
        default: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            default: Some(default),
            cardinality: Cardinality::Single,
            object: None,
        }
    }

    pub const fn objects(name: &'static str, object: EntityKind) -> Self {
        Self {
            name,
            kind: ValueKind::Object,
            default: None,
            cardinality: Cardinality::Multi,
            object: Some(object),
        }
    }

    pub fn is_multi(&self) -> bool {
        self.cardinality == Cardinality::Multi
    }

    pub fn introduces_object(&self) -> bool {
        self.kind == ValueKind::Object
    }
}

/// The legal properties of one entity kind.
#[derive(Debug)]
pub struct PropertySet {
    pub entity: EntityKind,
    properties: &'static [Property],
}

impl PropertySet {
    pub const fn new(entity: EntityKind, properties: &'static [Property]) -> Self {
        Self { entity, properties }
    }

    pub fn get(&self, name: &str) -> Option<&'static Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Property> {
        self.properties.iter()
    }
}

pub static TABLE_PROPERTIES: PropertySet =
    PropertySet::new(EntityKind::Table, &[Property::required("cols", ValueKind::List)]);

pub static PLOT_PROPERTIES: PropertySet = PropertySet::new(
    EntityKind::Plot,
    &[
        Property::with_default("axes", ValueKind::List, "x;y"),
        Property::with_default("xrange", ValueKind::Range, "autoscale"),
        Property::with_default("yrange", ValueKind::Range, "autoscale"),
        Property::objects("curve", EntityKind::Curve),
    ],
);

pub static CURVE_PROPERTIES: PropertySet = PropertySet::new(
    EntityKind::Curve,
    &[
        Property::with_default("color", ValueKind::Str, "black"),
        Property::with_default("style", ValueKind::Str, "lines+points"),
        Property::with_default("x", ValueKind::Str, "x"),
        Property::with_default("y", ValueKind::Str, "y"),
        Property::with_default("scope", ValueKind::Str, ""),
    ],
);
