//! Key normalization for parsed maps.

use crate::value::{Document, RawMap, Value, ValueKind};

/// Failure to turn a [`RawMap`] into a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizationError {
    /// A key has no unambiguous string form.
    #[error("map key of type {kind} cannot be used as a field name")]
    UnsupportedKey {
        /// Kind of the offending key.
        kind: ValueKind,
    },
    /// Two distinct keys render to the same string.
    #[error("map key `{key}` appears more than once after conversion to string")]
    KeyCollision {
        /// The colliding string key.
        key: String,
    },
}

/// Converts an arbitrary-keyed map into a string-keyed [`Document`].
///
/// Scalar keys use their display form (`1` -> `"1"`, `true` -> `"true"`).
/// Values are carried over untouched; nested maps are normalized lazily by
/// whichever record or open map consumes them.
pub fn normalize(map: &RawMap) -> Result<Document, NormalizationError> {
    let mut document = Document::new();
    for (key, value) in map.iter() {
        let key = key_to_string(key).ok_or(NormalizationError::UnsupportedKey { kind: key.kind() })?;
        if document.contains_key(&key) {
            return Err(NormalizationError::KeyCollision { key });
        }
        document.insert(key, value.clone());
    }
    Ok(document)
}

pub(crate) fn key_to_string(key: &Value) -> Option<String> {
    match key {
        Value::String(value) => Some(value.clone()),
        Value::Int(value) => Some(value.to_string()),
        Value::Float(value) => Some(value.to_string()),
        Value::Bool(value) => Some(value.to_string()),
        Value::Null | Value::Seq(_) | Value::Map(_) => None,
    }
}
