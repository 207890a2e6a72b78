//! Field predicates: duration pattern, sibling-key lookup, live reachability.

use crate::path::FieldPath;
use crate::probe::HttpProbe;
use crate::record::{FieldRef, RecordView};
use regex::Regex;
use std::sync::LazyLock;

static DURATION_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(w|m|d|h|s)$").ok());

/// Everything a predicate may look at.
#[derive(Clone, Copy)]
pub struct PredicateInput<'a> {
    /// The field's value.
    pub value: FieldRef<'a>,
    /// Record that owns the field.
    pub parent: &'a dyn RecordView,
    /// Top-level record being validated.
    pub root: &'a dyn RecordView,
    /// Location of the field.
    pub path: &'a FieldPath,
}

/// True when `text` is digits followed by exactly one of `w`, `m`, `d`, `h`, `s`.
///
/// ```
/// use fieldgroup_core::is_duration;
///
/// assert!(is_duration("30d"));
/// assert!(!is_duration("30"));
/// assert!(!is_duration("1h30m"));
/// ```
pub fn is_duration(text: &str) -> bool {
    DURATION_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(text))
}

/// Duration rule. Non-string values fail.
pub fn check_duration(input: &PredicateInput<'_>) -> bool {
    input.value.as_str().is_some_and(is_duration)
}

/// Sibling-key rule: the value must be a key of the parent's open-map field `sibling`.
///
/// Fails closed when the sibling is missing or not an open map.
pub fn check_found_in(input: &PredicateInput<'_>, sibling: &str) -> bool {
    let Some(key) = input.value.as_str() else {
        return false;
    };
    match input.parent.field(sibling) {
        Some(FieldRef::Map(map)) => map.contains_key(key),
        _ => false,
    }
}

/// Reachability rule: one GET through `probe`; only status 200 passes.
pub fn check_reachable(input: &PredicateInput<'_>, probe: &dyn HttpProbe) -> bool {
    let Some(url) = input.value.as_str() else {
        return false;
    };
    match probe.get(url) {
        Ok(200) => true,
        Ok(status) => {
            tracing::debug!(path = %input.path, status, "reachability probe returned non-200");
            false
        },
        Err(error) => {
            tracing::debug!(path = %input.path, %error, "reachability probe failed");
            false
        },
    }
}
