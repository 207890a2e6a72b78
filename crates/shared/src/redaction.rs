//! Secret detection and redaction utilities.
//!
//! Field groups carry credentials (`aws_secret_key`, `security_scanner_v4_psk`,
//! ...). Anything printed back to the user goes through these helpers first.

/// The redacted placeholder string.
pub const REDACTED: &str = "[REDACTED]";

/// Checks if a key name likely refers to a secret.
///
/// Matching is case-insensitive and works for both env var names and
/// snake_case document keys.
///
/// # Examples
///
/// ```
/// use fieldgroup_shared::is_secret_key;
///
/// assert!(is_secret_key("aws_secret_key"));
/// assert!(is_secret_key("security_scanner_v4_psk"));
/// assert!(!is_secret_key("logs_model"));
/// ```
pub fn is_secret_key(key: &str) -> bool {
    let key = key.to_ascii_uppercase();
    key.ends_with("_KEY")
        || key == "KEY"
        || key.ends_with("_PSK")
        || key.contains("TOKEN")
        || key.contains("SECRET")
        || key.contains("PASSWORD")
        || key.contains("CREDENTIAL")
}

/// Redacts a value if the key is likely a secret.
///
/// # Examples
///
/// ```
/// use fieldgroup_shared::redact_if_secret;
///
/// assert_eq!(redact_if_secret("access_key", "AKIA123"), "[REDACTED]");
/// assert_eq!(redact_if_secret("host", "es.local"), "es.local");
/// ```
pub fn redact_if_secret(key: &str, value: &str) -> String {
    if is_secret_key(key) {
        REDACTED.to_string()
    } else {
        value.to_string()
    }
}
