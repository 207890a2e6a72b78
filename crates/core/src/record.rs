//! Traits connecting typed records to the materializer and validator.
//!
//! `#[derive(Record)]` implements [`Record`], [`RecordView`] and
//! [`FieldType`] for a struct. Field types implement [`FieldType`], which
//! knows how to coerce a raw [`Value`] and how to expose itself as a
//! borrowed [`FieldRef`].

use crate::error::{FieldError, FieldErrorKind};
use crate::materialize::materialize_at;
use crate::normalize::normalize;
use crate::path::FieldPath;
use crate::schema::{DefaultValue, FieldKind, RecordSchema};
use crate::value::{Document, Value};
use std::fmt;
use std::num::FpCategory;

/// A type that can occupy a record field.
pub trait FieldType: Sized + Default {
    /// Declared kind, recorded in the schema table.
    const KIND: FieldKind;

    /// Converts a raw value. On failure, pushes one or more errors and returns `None`.
    fn coerce(value: &Value, path: &FieldPath, errors: &mut Vec<FieldError>) -> Option<Self>;

    /// Builds the value for a declared default. `None` means the zero value.
    fn from_default(_default: &DefaultValue) -> Option<Self> {
        None
    }

    /// Borrowed view used by validation and serialization.
    fn view(&self) -> FieldRef<'_>;
}

/// Object-safe handle to a mutable record field.
pub trait Slot {
    /// Overwrites the field with its declared default.
    fn apply_default(&mut self, default: &DefaultValue);
    /// Replaces the field with `value` if it coerces; otherwise records errors and keeps the current value.
    fn merge(&mut self, value: &Value, path: &FieldPath, errors: &mut Vec<FieldError>);
}

impl<T: FieldType> Slot for T {
    fn apply_default(&mut self, default: &DefaultValue) {
        *self = T::from_default(default).unwrap_or_default();
    }

    fn merge(&mut self, value: &Value, path: &FieldPath, errors: &mut Vec<FieldError>) {
        if let Some(coerced) = T::coerce(value, path, errors) {
            *self = coerced;
        }
    }
}

/// Read-only, named-field access to a materialized record.
pub trait RecordView {
    /// Schema of the concrete record type.
    fn schema(&self) -> &'static RecordSchema;
    /// Value of the field stored under document key `key`.
    fn field(&self, key: &str) -> Option<FieldRef<'_>>;
}

/// A record type the materializer can build.
pub trait Record: RecordView + Default {
    /// Schema of this record type.
    fn record_schema() -> &'static RecordSchema;
    /// Mutable slot for the field stored under document key `key`.
    fn slot_mut(&mut self, key: &str) -> Option<&mut dyn Slot>;
}

/// Borrowed view of one field value.
#[derive(Clone, Copy)]
pub enum FieldRef<'a> {
    /// String field.
    String(&'a str),
    /// Integer field.
    Int(i64),
    /// Boolean field.
    Bool(bool),
    /// Float field.
    Float(f64),
    /// Untyped field.
    Value(&'a Value),
    /// Sequence field, viewed element by element.
    Sequence(&'a dyn SequenceView),
    /// Open-ended map field.
    Map(&'a OpenMap),
    /// Nested record field; `None` when absent.
    Record(Option<&'a dyn RecordView>),
}

/// Element access for sequence fields.
pub trait SequenceView {
    /// Number of elements.
    fn len(&self) -> usize;
    /// Element at `index`.
    fn get(&self, index: usize) -> Option<FieldRef<'_>>;
    /// True when the sequence has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: FieldType> SequenceView for Vec<T> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn get(&self, index: usize) -> Option<FieldRef<'_>> {
        self.as_slice().get(index).map(FieldType::view)
    }
}

impl<'a> FieldRef<'a> {
    /// True for the zero value of the field's type.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::String(value) => value.is_empty(),
            Self::Int(value) => *value == 0,
            Self::Bool(value) => !value,
            Self::Float(value) => value.classify() == FpCategory::Zero,
            Self::Value(value) => match value {
                Value::Null => true,
                Value::String(text) => text.is_empty(),
                Value::Seq(items) => items.is_empty(),
                Value::Map(map) => map.is_empty(),
                Value::Bool(_) | Value::Int(_) | Value::Float(_) => false,
            },
            Self::Sequence(items) => items.is_empty(),
            Self::Map(map) => map.is_empty(),
            Self::Record(record) => record.is_none(),
        }
    }

    /// String payload, if this is a string field.
    #[must_use]
    pub const fn as_str(&self) -> Option<&'a str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Nested record, if present.
    #[must_use]
    pub fn as_record(&self) -> Option<&'a dyn RecordView> {
        match self {
            Self::Record(record) => *record,
            _ => None,
        }
    }

    /// Owned value with the same content, or `None` for an absent record.
    #[must_use]
    pub fn to_value(&self) -> Option<Value> {
        Some(match self {
            Self::String(value) => Value::String((*value).to_owned()),
            Self::Int(value) => Value::Int(*value),
            Self::Bool(value) => Value::Bool(*value),
            Self::Float(value) => Value::Float(*value),
            Self::Value(value) => (*value).clone(),
            Self::Sequence(items) => Value::Seq(
                (0..items.len())
                    .filter_map(|index| items.get(index))
                    .map(|item| item.to_value().unwrap_or_default())
                    .collect(),
            ),
            Self::Map(map) => Value::from_document(map.as_document().clone()),
            Self::Record(record) => Value::from_document(crate::to_document((*record)?)),
        })
    }
}

impl fmt::Debug for FieldRef<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => formatter.debug_tuple("String").field(value).finish(),
            Self::Int(value) => formatter.debug_tuple("Int").field(value).finish(),
            Self::Bool(value) => formatter.debug_tuple("Bool").field(value).finish(),
            Self::Float(value) => formatter.debug_tuple("Float").field(value).finish(),
            Self::Value(value) => formatter.debug_tuple("Value").field(value).finish(),
            Self::Sequence(items) => write!(formatter, "Sequence(len={})", items.len()),
            Self::Map(map) => formatter.debug_tuple("Map").field(map).finish(),
            Self::Record(Some(record)) => write!(formatter, "Record({})", record.schema().name),
            Self::Record(None) => formatter.write_str("Record(None)"),
        }
    }
}

/// Open-ended settings map: string keys, values kept verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpenMap(Document);

impl OpenMap {
    /// Wraps a document.
    #[must_use]
    pub const fn new(document: Document) -> Self {
        Self(document)
    }

    /// Borrows the entries.
    #[must_use]
    pub const fn as_document(&self) -> &Document {
        &self.0
    }

    /// True when `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Entry for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// True when the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<Document> for OpenMap {
    fn from(document: Document) -> Self {
        Self(document)
    }
}

fn mismatch<T>(
    value: &Value,
    path: &FieldPath,
    expected: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    errors.push(FieldError::wrong_type(path.clone(), expected, value.kind()));
    None
}

impl FieldType for String {
    const KIND: FieldKind = FieldKind::String;

    fn coerce(value: &Value, path: &FieldPath, errors: &mut Vec<FieldError>) -> Option<Self> {
        match value {
            Value::String(text) => Some(text.clone()),
            other => mismatch(other, path, "string", errors),
        }
    }

    fn from_default(default: &DefaultValue) -> Option<Self> {
        match default {
            DefaultValue::Str(text) => Some((*text).to_owned()),
            _ => None,
        }
    }

    fn view(&self) -> FieldRef<'_> {
        FieldRef::String(self)
    }
}

impl FieldType for i64 {
    const KIND: FieldKind = FieldKind::Int;

    fn coerce(value: &Value, path: &FieldPath, errors: &mut Vec<FieldError>) -> Option<Self> {
        match value {
            Value::Int(number) => Some(*number),
            other => mismatch(other, path, "int", errors),
        }
    }

    fn from_default(default: &DefaultValue) -> Option<Self> {
        match default {
            DefaultValue::Int(number) => Some(*number),
            _ => None,
        }
    }

    fn view(&self) -> FieldRef<'_> {
        FieldRef::Int(*self)
    }
}

impl FieldType for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn coerce(value: &Value, path: &FieldPath, errors: &mut Vec<FieldError>) -> Option<Self> {
        match value {
            Value::Bool(flag) => Some(*flag),
            other => mismatch(other, path, "bool", errors),
        }
    }

    fn from_default(default: &DefaultValue) -> Option<Self> {
        match default {
            DefaultValue::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    fn view(&self) -> FieldRef<'_> {
        FieldRef::Bool(*self)
    }
}

impl FieldType for f64 {
    const KIND: FieldKind = FieldKind::Float;

    #[allow(
        clippy::cast_precision_loss,
        reason = "integer literals in float fields are accepted the way YAML writers emit them"
    )]
    fn coerce(value: &Value, path: &FieldPath, errors: &mut Vec<FieldError>) -> Option<Self> {
        match value {
            Value::Float(number) => Some(*number),
            Value::Int(number) => Some(*number as Self),
            other => mismatch(other, path, "float", errors),
        }
    }

    fn from_default(default: &DefaultValue) -> Option<Self> {
        match default {
            DefaultValue::Float(number) => Some(*number),
            _ => None,
        }
    }

    fn view(&self) -> FieldRef<'_> {
        FieldRef::Float(*self)
    }
}

impl FieldType for Value {
    const KIND: FieldKind = FieldKind::Any;

    fn coerce(value: &Value, _path: &FieldPath, _errors: &mut Vec<FieldError>) -> Option<Self> {
        Some(value.clone())
    }

    fn view(&self) -> FieldRef<'_> {
        FieldRef::Value(self)
    }
}

impl FieldType for OpenMap {
    const KIND: FieldKind = FieldKind::OpenMap;

    fn coerce(value: &Value, path: &FieldPath, errors: &mut Vec<FieldError>) -> Option<Self> {
        let Value::Map(map) = value else {
            return mismatch(value, path, "map", errors);
        };
        match normalize(map) {
            Ok(document) => Some(Self(document)),
            Err(error) => {
                errors.push(FieldError {
                    path: path.clone(),
                    kind: FieldErrorKind::Normalization(error),
                });
                None
            },
        }
    }

    fn view(&self) -> FieldRef<'_> {
        FieldRef::Map(self)
    }
}

impl<T: FieldType> FieldType for Vec<T> {
    const KIND: FieldKind = FieldKind::Sequence(&T::KIND);

    fn coerce(value: &Value, path: &FieldPath, errors: &mut Vec<FieldError>) -> Option<Self> {
        let Value::Seq(items) = value else {
            return mismatch(value, path, "sequence", errors);
        };
        // Coerce every element so each failure is reported, then keep the
        // default unless all of them succeeded.
        let coerced: Vec<Option<T>> = items
            .iter()
            .enumerate()
            .map(|(index, item)| T::coerce(item, &path.index(index), errors))
            .collect();
        coerced.into_iter().collect()
    }

    fn view(&self) -> FieldRef<'_> {
        FieldRef::Sequence(self)
    }
}

impl<R: Record + FieldType> FieldType for Option<R> {
    const KIND: FieldKind = R::KIND;

    fn coerce(value: &Value, path: &FieldPath, errors: &mut Vec<FieldError>) -> Option<Self> {
        R::coerce(value, path, errors).map(Some)
    }

    fn view(&self) -> FieldRef<'_> {
        FieldRef::Record(self.as_ref().map(|record| -> &dyn RecordView { record }))
    }
}

/// Coerces a map value into record `R`, reporting nested errors under `path`.
///
/// Used by derived [`FieldType`] impls. Nested field errors do not fail the
/// record; only a non-map value or a key normalization failure does.
pub fn coerce_record<R: Record>(
    value: &Value,
    path: &FieldPath,
    errors: &mut Vec<FieldError>,
) -> Option<R> {
    let Value::Map(map) = value else {
        return mismatch(value, path, "map", errors);
    };
    match normalize(map) {
        Ok(document) => Some(materialize_at::<R>(&document, path, errors)),
        Err(error) => {
            errors.push(FieldError {
                path: path.clone(),
                kind: FieldErrorKind::Normalization(error),
            });
            None
        },
    }
}
