//! # fieldgroup-shared
//!
//! Foundation types used by every crate in the fieldgroup workspace:
//!
//! - [`ErrorEnvelope`] for boundary errors (env parsing, document loading, registry lookups)
//! - secret-key detection for redacting configuration output
//! - const-generic bounded integers for tool settings
//!
//! This crate has no workspace dependencies.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod errors;
pub mod invariants;
pub mod redaction;
pub mod result;

pub use errors::{
    ErrorClass, ErrorCode, ErrorEnvelope, ErrorKind, ErrorMetadata, UnexpectedError,
    normalize_unexpected_error,
};
pub use invariants::{BoundedU64, BoundsError};
pub use redaction::{REDACTED, is_secret_key, redact_if_secret};
pub use result::Result;

/// Returns the shared crate version.
#[must_use]
pub const fn shared_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::errors::{ErrorClass, ErrorCode, ErrorEnvelope, ErrorKind};
    use super::result::Result;

    #[test]
    fn shared_crate_version_is_set() {
        assert!(!super::shared_crate_version().is_empty());
    }

    #[test]
    fn shared_result_defaults_to_envelope() {
        let value: Result<i32> = Err(ErrorEnvelope::expected(
            ErrorCode::invalid_input(),
            "bad document",
        ));
        let Err(error) = value else {
            return;
        };
        assert_eq!(error.kind, ErrorKind::Expected);
        assert_eq!(error.class, ErrorClass::NonRetriable);
    }
}
