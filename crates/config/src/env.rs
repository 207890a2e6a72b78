//! Environment variable parsing for the tool's own settings.
//!
//! Parsing is strict: a variable that is present but empty or malformed
//! fails instead of silently falling back to the default.

use fieldgroup_shared::{BoundedU64, ErrorCode, ErrorEnvelope, redact_if_secret};
use std::collections::BTreeMap;
use std::fmt;

/// Env var: enable outbound reachability probes.
pub const ENV_PROBE_ENABLED: &str = "FIELDGROUP_PROBE_ENABLED";
/// Env var: per-probe timeout in milliseconds.
pub const ENV_PROBE_TIMEOUT_MS: &str = "FIELDGROUP_PROBE_TIMEOUT_MS";

/// Probe timeout, bounded to `[100, 60000]` milliseconds.
pub type ProbeTimeoutMs = BoundedU64<100, 60_000>;

/// Default probe timeout in milliseconds.
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 5_000;

/// Settings for the `reachable` rule's HTTP probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSettings {
    enabled: bool,
    timeout_ms: ProbeTimeoutMs,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: ProbeTimeoutMs::saturating(DEFAULT_PROBE_TIMEOUT_MS),
        }
    }
}

impl ProbeSettings {
    /// Parse settings from a key/value map (useful for tests and fixtures).
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        let defaults = Self::default();
        let enabled = parse_optional_bool(map, ENV_PROBE_ENABLED)?.unwrap_or(defaults.enabled);
        let timeout_ms = match parse_optional_u64(map, ENV_PROBE_TIMEOUT_MS)? {
            None => defaults.timeout_ms,
            Some(raw) => {
                ProbeTimeoutMs::try_new(raw).map_err(|error| EnvParseError::OutOfRange {
                    var: ENV_PROBE_TIMEOUT_MS,
                    value: raw,
                    min: error.min,
                    max: error.max,
                })?
            },
        };
        Ok(Self {
            enabled,
            timeout_ms,
        })
    }

    /// Parse settings from the current process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let mut map = BTreeMap::new();
        for name in [ENV_PROBE_ENABLED, ENV_PROBE_TIMEOUT_MS] {
            if let Some(value) = std::env::var_os(name) {
                map.insert(name.to_owned(), value.to_string_lossy().into_owned());
            }
        }
        Self::from_map(&map)
    }

    /// Same settings with probing switched off.
    #[must_use]
    pub const fn disabled(self) -> Self {
        Self {
            enabled: false,
            ..self
        }
    }

    /// Whether `reachable` rules should hit the network.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Per-probe timeout in milliseconds.
    #[must_use]
    pub const fn timeout_ms(&self) -> u64 {
        self.timeout_ms.get()
    }
}

/// Env parsing errors (typed, stable, and safe to surface).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Boolean env var had an invalid value.
    InvalidBool {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Integer env var had an invalid value.
    InvalidInt {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Integer env var parsed but fell outside its bounds.
    OutOfRange {
        /// Env var name.
        var: &'static str,
        /// Parsed value.
        value: u64,
        /// Inclusive minimum.
        min: u64,
        /// Inclusive maximum.
        max: u64,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "empty_env_var"),
            Self::InvalidBool { .. } => ErrorCode::new("config", "invalid_env_bool"),
            Self::InvalidInt { .. } => ErrorCode::new("config", "invalid_env_int"),
            Self::OutOfRange { .. } => ErrorCode::new("config", "env_out_of_range"),
        }
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty"),
            Self::InvalidBool { var, .. } => write!(formatter, "{var} must be a boolean"),
            Self::InvalidInt { var, .. } => write!(formatter, "{var} must be an integer"),
            Self::OutOfRange { var, min, max, .. } => {
                write!(formatter, "{var} must be between {min} and {max}")
            },
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let envelope = Self::expected(code, message);

        match error {
            EnvParseError::EmptyValue { var } => envelope.with_metadata("env_var", var),
            EnvParseError::InvalidBool { var, value } | EnvParseError::InvalidInt { var, value } => {
                envelope
                    .with_metadata("env_var", var)
                    .with_metadata("value", redact_if_secret(var, &value))
            },
            EnvParseError::OutOfRange {
                var,
                value,
                min,
                max,
            } => envelope
                .with_metadata("env_var", var)
                .with_metadata("value", value.to_string())
                .with_metadata("min", min.to_string())
                .with_metadata("max", max.to_string()),
        }
    }
}

fn parse_optional_u64(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<u64>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    trimmed
        .parse::<u64>()
        .map(Some)
        .map_err(|_| EnvParseError::InvalidInt {
            var,
            value: raw.clone(),
        })
}

fn parse_optional_bool(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<bool>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(EnvParseError::InvalidBool {
            var,
            value: raw.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_unset() -> Result<(), EnvParseError> {
        let settings = ProbeSettings::from_map(&BTreeMap::new())?;
        assert!(settings.enabled());
        assert_eq!(settings.timeout_ms(), DEFAULT_PROBE_TIMEOUT_MS);
        assert_eq!(settings, ProbeSettings::default());
        Ok(())
    }

    #[test]
    fn parses_bool_spellings_and_timeout() -> Result<(), EnvParseError> {
        let settings = ProbeSettings::from_map(&env(&[
            (ENV_PROBE_ENABLED, " Off "),
            (ENV_PROBE_TIMEOUT_MS, "250"),
        ]))?;
        assert!(!settings.enabled());
        assert_eq!(settings.timeout_ms(), 250);
        Ok(())
    }

    #[test]
    fn empty_and_malformed_values_fail() {
        assert_eq!(
            ProbeSettings::from_map(&env(&[(ENV_PROBE_ENABLED, "  ")])),
            Err(EnvParseError::EmptyValue {
                var: ENV_PROBE_ENABLED
            })
        );
        assert!(matches!(
            ProbeSettings::from_map(&env(&[(ENV_PROBE_ENABLED, "maybe")])),
            Err(EnvParseError::InvalidBool { .. })
        ));
        assert!(matches!(
            ProbeSettings::from_map(&env(&[(ENV_PROBE_TIMEOUT_MS, "5s")])),
            Err(EnvParseError::InvalidInt { .. })
        ));
    }

    #[test]
    fn timeout_outside_bounds_maps_to_envelope() {
        let error = ProbeSettings::from_map(&env(&[(ENV_PROBE_TIMEOUT_MS, "99")])).err();
        assert_eq!(
            error,
            Some(EnvParseError::OutOfRange {
                var: ENV_PROBE_TIMEOUT_MS,
                value: 99,
                min: 100,
                max: 60_000,
            })
        );

        let envelope = error.map(ErrorEnvelope::from);
        let code = envelope.as_ref().map(|envelope| envelope.code.to_string());
        assert_eq!(code.as_deref(), Some("config:env_out_of_range"));
        assert_eq!(
            envelope
                .as_ref()
                .and_then(|envelope| envelope.metadata.get("max"))
                .map(String::as_str),
            Some("60000")
        );
    }

    #[test]
    fn disabled_keeps_timeout() -> Result<(), EnvParseError> {
        let settings = ProbeSettings::from_map(&env(&[(ENV_PROBE_TIMEOUT_MS, "1000")]))?.disabled();
        assert!(!settings.enabled());
        assert_eq!(settings.timeout_ms(), 1_000);
        Ok(())
    }
}
