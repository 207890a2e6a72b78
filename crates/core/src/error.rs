//! Field errors collected during materialization.

use crate::normalize::NormalizationError;
use crate::path::FieldPath;
use crate::value::ValueKind;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// Why a field value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldErrorKind {
    /// The value's kind does not match the declared field type.
    #[error("must be of type {expected}")]
    WrongType {
        /// Declared type name.
        expected: &'static str,
        /// Kind actually found.
        found: ValueKind,
    },
    /// A nested map could not be normalized.
    #[error("must be a map with string keys: {0}")]
    Normalization(#[from] NormalizationError),
}

/// A rejected value and where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Location of the value.
    pub path: FieldPath,
    /// Rejection reason.
    pub kind: FieldErrorKind,
}

impl FieldError {
    /// Type mismatch at `path`.
    #[must_use]
    pub const fn wrong_type(path: FieldPath, expected: &'static str, found: ValueKind) -> Self {
        Self {
            path,
            kind: FieldErrorKind::WrongType { expected, found },
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} {}", self.path, self.kind)
    }
}

impl std::error::Error for FieldError {}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_struct("FieldError", 4)?;
        out.serialize_field("path", &self.path)?;
        out.serialize_field("message", &self.to_string())?;
        match &self.kind {
            FieldErrorKind::WrongType { expected, found } => {
                out.serialize_field("expected", expected)?;
                out.serialize_field("found", found)?;
            },
            FieldErrorKind::Normalization(_) => {
                out.skip_field("expected")?;
                out.skip_field("found")?;
            },
        }
        out.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_type_reads_like_a_sentence() {
        let path = FieldPath::root()
            .key("logs_model_config")
            .key("kafka_config")
            .key("bootstrap_servers");
        let error = FieldError::wrong_type(path, "sequence", ValueKind::String);
        assert_eq!(
            error.to_string(),
            "logs_model_config.kafka_config.bootstrap_servers must be of type sequence"
        );
    }

    #[test]
    fn normalization_errors_keep_the_cause() {
        let error = FieldError {
            path: FieldPath::root().key("index_settings"),
            kind: NormalizationError::UnsupportedKey {
                kind: ValueKind::Null,
            }
            .into(),
        };
        assert!(error.to_string().starts_with("index_settings must be a map"));
        assert!(error.to_string().contains("null"));
    }
}
