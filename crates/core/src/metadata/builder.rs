//! Metadata builder: property-assignment lines to a typed [`Metadata`] map.
//!
//! Two line shapes are understood:
//!
//! - `key=value` assigns a top-level property
//! - `.key=value` assigns a property of the nested object currently being
//!   built (e.g. a plot's `curve`)
//!
//! A top-level assignment always finalizes the nested object in flight
//! before it is processed. Nested values are kept as raw text until the
//! object is finalized, then converted against the nested entity's own
//! property set.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::debug;

use super::convert::Converters;
use super::property::{EntityKind, Property, PropertySet, ValueKind};
use super::value::{MetaValue, Metadata, SubObject};
use crate::error::ErrorKind;

static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(\.?)(\w+)[ \t]*=[ \t]*(.*?)[ \t]*\r?$").expect("valid regex")
});

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetadataError {
    #[error("unknown {entity} property '{key}'")]
    UnknownProperty { entity: EntityKind, key: String },

    #[error("no converter registered for {kind} values (property '{property}')")]
    NoConverterForKind { kind: ValueKind, property: String },

    #[error("no object is currently being built: .{key}={value}")]
    DanglingSubProperty { key: String, value: String },

    #[error("value is not presented for required {entity} property '{property}'")]
    MissingRequiredProperty { entity: EntityKind, property: String },

    #[error("invalid value for property '{property}': {reason}")]
    InvalidValue { property: String, value: String, reason: String },
}

impl MetadataError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownProperty { .. } => ErrorKind::UnknownProperty,
            Self::NoConverterForKind { .. } => ErrorKind::NoConverterForKind,
            Self::DanglingSubProperty { .. } => ErrorKind::DanglingSubProperty,
            Self::MissingRequiredProperty { .. } => ErrorKind::MissingRequiredProperty,
            Self::InvalidValue { .. } => ErrorKind::InvalidValue,
        }
    }
}

/// Nested object whose `.key=value` lines are still being collected.
#[derive(Debug)]
struct PendingObject {
    property: &'static Property,
    title: String,
    values: Vec<(String, String)>,
}

#[derive(Debug)]
enum BuildState {
    Idle,
    Building(PendingObject),
}

/// Incremental builder over one property set.
#[derive(Debug)]
pub struct MetadataBuilder<'c> {
    properties: &'static PropertySet,
    converters: &'c Converters,
    metadata: Metadata,
    state: BuildState,
}

impl<'c> MetadataBuilder<'c> {
    pub fn new(properties: &'static PropertySet, converters: &'c Converters) -> Self {
        Self { properties, converters, metadata: Metadata::new(), state: BuildState::Idle }
    }

    pub fn is_building(&self) -> bool {
        matches!(self.state, BuildState::Building(_))
    }

    /// Feed every assignment line of `text`, in order.
    ///
    /// Lines that are not assignments are skipped.
    pub fn feed(&mut self, text: &str) -> Result<(), MetadataError> {
        for line in text.lines() {
            if !self.feed_line(line)? && !line.trim().is_empty() {
                debug!(line, "ignoring non-assignment line");
            }
        }
        Ok(())
    }

    /// Feed a single line. Returns whether it was an assignment.
    pub fn feed_line(&mut self, line: &str) -> Result<bool, MetadataError> {
        let Some(caps) = ASSIGNMENT.captures(line) else {
            return Ok(false);
        };
        let nested = !caps[1].is_empty();
        let key = &caps[2];
        let value = caps.get(3).map_or("", |m| m.as_str());

        if nested {
            self.put_sub(key, value)?;
        } else {
            self.put(key, value)?;
        }
        Ok(true)
    }

    /// Top-level `key=value`.
    pub fn put(&mut self, key: &str, value: &str) -> Result<(), MetadataError> {
        self.flush()?;

        let prop = self.properties.get(key).ok_or_else(|| MetadataError::UnknownProperty {
            entity: self.properties.entity,
            key: key.to_string(),
        })?;

        if prop.introduces_object() {
            self.state = BuildState::Building(PendingObject {
                property: prop,
                title: value.trim().to_string(),
                values: Vec::new(),
            });
        } else {
            let converted = convert(self.converters, prop, value)?;
            store(&mut self.metadata, prop, converted);
        }
        Ok(())
    }

    /// Nested `.key=value`, kept raw until the object is finalized.
    pub fn put_sub(&mut self, key: &str, value: &str) -> Result<(), MetadataError> {
        match &mut self.state {
            BuildState::Building(pending) => {
                pending.values.push((key.to_string(), value.to_string()));
                Ok(())
            }
            BuildState::Idle => Err(MetadataError::DanglingSubProperty {
                key: key.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Finalize the nested object in flight, if any, into the parent map.
    fn flush(&mut self) -> Result<(), MetadataError> {
        let BuildState::Building(pending) = std::mem::replace(&mut self.state, BuildState::Idle)
        else {
            return Ok(());
        };

        let prop = pending.property;
        let Some(entity) = prop.object else {
            return Err(MetadataError::NoConverterForKind {
                kind: prop.kind,
                property: prop.name.to_string(),
            });
        };

        let nested = entity.properties();
        let mut metadata = Metadata::new();
        for (key, raw) in &pending.values {
            let sub = nested.get(key).ok_or_else(|| MetadataError::UnknownProperty {
                entity,
                key: key.clone(),
            })?;
            let converted = convert(self.converters, sub, raw)?;
            store(&mut metadata, sub, converted);
        }
        apply_defaults(&mut metadata, nested, self.converters)?;

        debug!(%entity, title = %pending.title, %metadata, "built nested object");
        let object = SubObject { kind: entity, title: pending.title, metadata };
        store(&mut self.metadata, prop, MetaValue::Object(object));
        Ok(())
    }

    /// Finalize the open object and fill in defaults.
    pub fn finish(mut self) -> Result<Metadata, MetadataError> {
        self.flush()?;
        apply_defaults(&mut self.metadata, self.properties, self.converters)?;
        Ok(self.metadata)
    }
}

/// Parse a block of assignment lines against `properties`.
pub fn parse_metadata(
    text: &str,
    properties: &'static PropertySet,
    converters: &Converters,
) -> Result<Metadata, MetadataError> {
    let mut builder = MetadataBuilder::new(properties, converters);
    builder.feed(text)?;
    builder.finish()
}

/// Whether `line` has the shape of a (possibly nested) assignment.
pub fn is_assignment(line: &str) -> bool {
    ASSIGNMENT.is_match(line)
}

fn convert(
    converters: &Converters,
    prop: &Property,
    raw: &str,
) -> Result<MetaValue, MetadataError> {
    let converter =
        converters.get(prop.kind).ok_or_else(|| MetadataError::NoConverterForKind {
            kind: prop.kind,
            property: prop.name.to_string(),
        })?;
    converter(raw).map_err(|reason| MetadataError::InvalidValue {
        property: prop.name.to_string(),
        value: raw.to_string(),
        reason,
    })
}

fn store(metadata: &mut Metadata, prop: &Property, value: MetaValue) {
    if prop.is_multi() {
        metadata.push(prop.name, value);
    } else {
        metadata.set(prop.name, value);
    }
}

fn apply_defaults(
    metadata: &mut Metadata,
    properties: &PropertySet,
    converters: &Converters,
) -> Result<(), MetadataError> {
    for prop in properties.iter() {
        if metadata.contains(prop.name) || prop.introduces_object() {
            continue;
        }
        let Some(default) = prop.default else {
            return Err(MetadataError::MissingRequiredProperty {
                entity: properties.entity,
                property: prop.name.to_string(),
            });
        };
        let converted = convert(converters, prop, default)?;
        store(metadata, prop, converted);
    }
    Ok(())
}
