//! Typed metadata for tables, plots and curves.
//!
//! Every entity kind declares a static [`PropertySet`]. Property-assignment
//! text is turned into a [`Metadata`] map by the [`MetadataBuilder`], which
//! converts values with the registered [`Converters`], builds nested
//! objects from `.key=value` runs and fills in declared defaults.

pub mod builder;
pub mod convert;
pub mod property;
pub mod value;

pub use builder::{MetadataBuilder, MetadataError, is_assignment, parse_metadata};
pub use convert::{Converter, Converters, parse_flag, parse_range};
pub use property::{
    CURVE_PROPERTIES, Cardinality, EntityKind, PLOT_PROPERTIES, Property, PropertySet,
    TABLE_PROPERTIES, ValueKind,
};
pub use value::{AxisRange, MetaEntry, MetaValue, Metadata, SubObject};
