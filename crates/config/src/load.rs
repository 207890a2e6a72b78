//! Document loading (YAML or JSON text into a normalized [`Document`]).
//!
//! Parsing never interprets field groups; it only produces the untyped
//! tree the materializer consumes. Failures surface as typed
//! `ErrorEnvelope`s.

use fieldgroup_core::{Document, RawMap, Value, normalize};
use fieldgroup_shared::{ErrorCode, ErrorEnvelope};
use std::path::Path;

/// Input syntax of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// YAML 1.2 (also accepts plain JSON).
    Yaml,
    /// Strict JSON.
    Json,
}

impl DocumentFormat {
    /// Detect the format from a file extension (`.yaml`, `.yml`, `.json`).
    pub fn from_path(path: &Path) -> Result<Self, ErrorEnvelope> {
        let ext = path
            .extension()
            .and_then(|value| value.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            other => Err(ErrorEnvelope::expected(
                ErrorCode::new("config", "unsupported_format"),
                "unsupported config format; use .yaml, .yml, or .json",
            )
            .with_metadata("extension", other.unwrap_or("").to_owned())
            .with_metadata("path", path.to_string_lossy().to_string())),
        }
    }
}

/// Parse `input` and normalize its top-level map.
///
/// An empty YAML document is treated as an empty map.
pub fn parse_document(input: &str, format: DocumentFormat) -> Result<Document, ErrorEnvelope> {
    let value = match format {
        DocumentFormat::Yaml => serde_yaml_ng::from_str::<serde_yaml_ng::Value>(input)
            .map(from_yaml)
            .map_err(|error| {
                ErrorEnvelope::expected(
                    ErrorCode::new("config", "invalid_yaml"),
                    format!("invalid config YAML: {error}"),
                )
            })?,
        DocumentFormat::Json => serde_json::from_str::<serde_json::Value>(input)
            .map(from_json)
            .map_err(|error| {
                ErrorEnvelope::expected(
                    ErrorCode::new("config", "invalid_json"),
                    format!("invalid config JSON: {error}"),
                )
            })?,
    };

    let map = match value {
        Value::Map(map) => map,
        Value::Null => RawMap::new(),
        other => {
            return Err(ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_document"),
                format!("config document must be a map, found {}", other.kind()),
            ));
        },
    };

    normalize(&map).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_document"),
            format!("invalid config document: {error}"),
        )
    })
}

/// Read, detect, and parse a configuration document from disk.
pub fn load_document_from_path(path: &Path) -> Result<Document, ErrorEnvelope> {
    let format = DocumentFormat::from_path(path)?;
    let text = std::fs::read_to_string(path).map_err(|error| {
        ErrorEnvelope::from(error).with_metadata("path", path.to_string_lossy().to_string())
    })?;
    let document = parse_document(&text, format)
        .map_err(|error| error.with_metadata("path", path.to_string_lossy().to_string()))?;
    tracing::debug!(
        path = %path.display(),
        keys = document.len(),
        "loaded config document"
    );
    Ok(document)
}

fn from_yaml(value: serde_yaml_ng::Value) -> Value {
    use serde_yaml_ng::Value as Yaml;
    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(value) => Value::Bool(value),
        Yaml::Number(number) => number_value(number.as_i64(), number.as_f64()),
        Yaml::String(value) => Value::String(value),
        Yaml::Sequence(items) => Value::Seq(items.into_iter().map(from_yaml).collect()),
        Yaml::Mapping(mapping) => Value::Map(
            mapping
                .into_iter()
                .map(|(key, value)| (from_yaml(key), from_yaml(value)))
                .collect(),
        ),
        Yaml::Tagged(tagged) => from_yaml(tagged.value),
    }
}

fn from_json(value: serde_json::Value) -> Value {
    use serde_json::Value as Json;
    match value {
        Json::Null => Value::Null,
        Json::Bool(value) => Value::Bool(value),
        Json::Number(number) => number_value(number.as_i64(), number.as_f64()),
        Json::String(value) => Value::String(value),
        Json::Array(items) => Value::Seq(items.into_iter().map(from_json).collect()),
        Json::Object(object) => Value::Map(
            object
                .into_iter()
                .map(|(key, value)| (Value::String(key), from_json(value)))
                .collect(),
        ),
    }
}

// Integers that do not fit `i64` (large unsigned values) fall back to float.
fn number_value(as_int: Option<i64>, as_float: Option<f64>) -> Value {
    match (as_int, as_float) {
        (Some(value), _) => Value::Int(value),
        (None, Some(value)) => Value::Float(value),
        (None, None) => Value::Null,
    }
}
