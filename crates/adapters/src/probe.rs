//! Blocking reqwest implementation of [`HttpProbe`].

use fieldgroup_config::ProbeSettings;
use fieldgroup_core::{HttpProbe, ProbeError};
use fieldgroup_shared::{ErrorClass, ErrorCode, ErrorEnvelope, Result};
use std::time::Duration;
use url::Url;

/// Connect timeout never exceeds this, even with a longer request timeout.
const MAX_CONNECT_TIMEOUT_MS: u64 = 3_000;

/// Redirect hops followed before the last 3xx is returned as the status.
pub const MAX_REDIRECTS: usize = 10;

/// Probe client configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReqwestProbeConfig {
    /// Whole-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// TCP/TLS connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
}

impl ReqwestProbeConfig {
    /// Build from the tool's env-derived settings.
    #[must_use]
    pub fn from_settings(settings: &ProbeSettings) -> Self {
        let timeout_ms = settings.timeout_ms();
        Self {
            timeout_ms,
            connect_timeout_ms: timeout_ms.min(MAX_CONNECT_TIMEOUT_MS),
        }
    }
}

/// Sends one GET per call with bounded timeouts and no retries.
///
/// Redirects are followed up to [`MAX_REDIRECTS`] hops; the final status is
/// returned. The request timeout covers the whole chain.
#[derive(Debug)]
pub struct ReqwestProbe {
    client: reqwest::blocking::Client,
    timeout_ms: u64,
}

impl ReqwestProbe {
    /// Build the probe client.
    ///
    /// Must not be called from inside an async runtime; the blocking client
    /// owns its own.
    pub fn new(config: ReqwestProbeConfig) -> Result<Self> {
        if config.timeout_ms == 0 {
            return Err(ErrorEnvelope::expected(
                ErrorCode::invalid_input(),
                "probe timeout must be greater than zero",
            ));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|error| {
                ErrorEnvelope::unexpected(
                    ErrorCode::new("probe", "client_init_failed"),
                    format!("failed to build probe client: {error}"),
                    ErrorClass::NonRetriable,
                )
            })?;
        Ok(Self {
            client,
            timeout_ms: config.timeout_ms,
        })
    }
}

impl HttpProbe for ReqwestProbe {
    fn get(&self, url: &str) -> std::result::Result<u16, ProbeError> {
        let parsed = parse_http_url(url)?;
        let shown = sanitize_url(&parsed);
        match self.client.get(parsed).send() {
            Ok(response) => {
                let status = response.status().as_u16();
                tracing::debug!(url = %shown, status, "probe response");
                Ok(status)
            },
            Err(error) if error.is_timeout() => {
                tracing::debug!(url = %shown, timeout_ms = self.timeout_ms, "probe timed out");
                Err(ProbeError::Timeout {
                    timeout_ms: self.timeout_ms,
                })
            },
            Err(error) => {
                tracing::debug!(url = %shown, %error, "probe transport failure");
                Err(ProbeError::Transport(error.without_url().to_string()))
            },
        }
    }
}

fn parse_http_url(raw: &str) -> std::result::Result<Url, ProbeError> {
    let url = Url::parse(raw).map_err(|error| ProbeError::InvalidUrl {
        reason: error.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ProbeError::InvalidUrl {
            reason: format!("unsupported scheme `{other}`"),
        }),
    }
}

fn sanitize_url(url: &Url) -> String {
    let mut clean = url.clone();
    if (!clean.username().is_empty() || clean.password().is_some())
        && (clean.set_username("").is_err() || clean.set_password(None).is_err())
    {
        return "[url with credentials]".to_owned();
    }
    clean.to_string()
}
