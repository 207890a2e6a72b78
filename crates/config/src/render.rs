//! Output helpers: secret redaction and deterministic JSON.

use fieldgroup_core::{Document, Value};
use fieldgroup_shared::{ErrorClass, ErrorCode, ErrorEnvelope, REDACTED, is_secret_key};
use serde::Serialize;
use url::Url;

/// Copy of `document` safe to print.
///
/// Non-empty values under secret-looking keys become `[REDACTED]` at any
/// depth, and credentials embedded in URL strings are stripped.
#[must_use]
pub fn redact_document(document: &Document) -> Document {
    document
        .iter()
        .map(|(key, value)| (key.clone(), redact_entry(key, value)))
        .collect()
}

fn redact_entry(key: &str, value: &Value) -> Value {
    if is_secret_key(key) && !is_blank(value) {
        return Value::from(REDACTED);
    }
    redact_value(value)
}

fn redact_value(value: &Value) -> Value {
    match value {
        Value::String(text) => Value::String(sanitize_url(text)),
        Value::Seq(items) => Value::Seq(items.iter().map(redact_value).collect()),
        Value::Map(map) => Value::Map(
            map.iter()
                .map(|(key, value)| {
                    let redacted = match key.as_str() {
                        Some(name) => redact_entry(name, value),
                        None => redact_value(value),
                    };
                    (key.clone(), redacted)
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

// Only strings that parse as URLs with a user or password are rewritten.
fn sanitize_url(text: &str) -> String {
    let Ok(mut parsed) = Url::parse(text) else {
        return text.to_owned();
    };
    if parsed.password().is_none() && parsed.username().is_empty() {
        return text.to_owned();
    }
    if parsed.set_username("").is_err() || parsed.set_password(None).is_err() {
        return REDACTED.to_owned();
    }
    parsed.to_string()
}

/// Serialize as pretty JSON with a trailing newline.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ErrorEnvelope> {
    let mut output = serde_json::to_string_pretty(value).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::new("config", "serialize_json"),
            format!("failed to serialize output: {error}"),
            ErrorClass::NonRetriable,
        )
    })?;
    output.push('\n');
    Ok(output)
}
