//! Static schema tables emitted by `#[derive(Record)]`.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// Schema of one record type.
#[derive(Debug)]
pub struct RecordSchema {
    /// Record type name.
    pub name: &'static str,
    /// Fields in declaration order.
    pub fields: &'static [FieldSchema],
}

impl RecordSchema {
    /// Looks up a field by document key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.key == key)
    }

    /// Iterates the document keys of this record.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.key)
    }
}

/// Schema of one field.
#[derive(Debug)]
pub struct FieldSchema {
    /// Document key.
    pub key: &'static str,
    /// Declared type.
    pub kind: FieldKind,
    /// Value used when the key is absent or malformed.
    pub default: DefaultValue,
    /// Rules evaluated by the validator.
    pub rules: &'static [Rule],
    /// Skip rules when the value is the zero value.
    pub omit_empty: bool,
}

/// Declared type of a field.
#[derive(Clone, Copy)]
pub enum FieldKind {
    /// `String`
    String,
    /// `i64`
    Int,
    /// `bool`
    Bool,
    /// `f64`
    Float,
    /// `Vec<T>` with the element kind.
    Sequence(&'static Self),
    /// A nested record.
    Record(fn() -> &'static RecordSchema),
    /// Open-ended string-keyed map copied verbatim.
    OpenMap,
    /// Any value, no coercion.
    Any,
}

impl FieldKind {
    /// Name used in `must be of type ...` messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Float => "float",
            Self::Sequence(_) => "sequence",
            Self::Record(_) | Self::OpenMap => "map",
            Self::Any => "any",
        }
    }

    /// Nested record schema, looking through sequences.
    #[must_use]
    pub fn record_schema(&self) -> Option<&'static RecordSchema> {
        match self {
            Self::Record(schema) => Some(schema()),
            Self::Sequence(element) => element.record_schema(),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequence(element) => write!(formatter, "sequence<{element}>"),
            Self::Record(schema) => formatter.write_str(schema().name),
            other => formatter.write_str(other.type_name()),
        }
    }
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, formatter)
    }
}

/// Declared default of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    /// The type's zero value.
    Zero,
    /// String literal.
    Str(&'static str),
    /// Integer literal.
    Int(i64),
    /// Boolean literal.
    Bool(bool),
    /// Float literal.
    Float(f64),
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => formatter.write_str("-"),
            Self::Str(value) => write!(formatter, "{value:?}"),
            Self::Int(value) => write!(formatter, "{value}"),
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::Float(value) => write!(formatter, "{value}"),
        }
    }
}

/// Validation rule attached to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Value matches `^[0-9]+(w|m|d|h|s)$`.
    Duration,
    /// Value is a key of the parent's open-map field `field`.
    FoundIn {
        /// Sibling field key.
        field: &'static str,
    },
    /// Value is a URL answering HTTP 200.
    Reachable,
}

impl Rule {
    /// Stable rule name used in reports.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Duration => "duration",
            Self::FoundIn { .. } => "found_in",
            Self::Reachable => "reachable",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FoundIn { field } => write!(formatter, "found_in({field})"),
            other => formatter.write_str(other.name()),
        }
    }
}

impl Serialize for FieldSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let rules: Vec<String> = self.rules.iter().map(ToString::to_string).collect();
        let mut out = serializer.serialize_struct("FieldSchema", 5)?;
        out.serialize_field("key", self.key)?;
        out.serialize_field("kind", &self.kind.to_string())?;
        out.serialize_field("default", &self.default.to_string())?;
        out.serialize_field("rules", &rules)?;
        out.serialize_field("omit_empty", &self.omit_empty)?;
        out.end()
    }
}

impl Serialize for RecordSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_struct("RecordSchema", 2)?;
        out.serialize_field("name", self.name)?;
        out.serialize_field("fields", self.fields)?;
        out.end()
    }
}
