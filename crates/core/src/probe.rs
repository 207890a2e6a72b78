//! Outbound HTTP seam used by the `reachable` rule.

/// Failure to obtain any HTTP status from a URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    /// The value is not an absolute http(s) URL.
    #[error("invalid url: {reason}")]
    InvalidUrl {
        /// Parser or scheme complaint.
        reason: String,
    },
    /// Connection, TLS, or protocol failure.
    #[error("transport error: {0}")]
    Transport(String),
    /// No response within the configured timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed.
        timeout_ms: u64,
    },
}

/// Issues a single GET and reports the status code.
///
/// Implementations must bound the call in time and must not retry. Deciding
/// which statuses count as reachable is left to the caller.
pub trait HttpProbe {
    /// GET `url` once.
    fn get(&self, url: &str) -> Result<u16, ProbeError>;
}

impl<P: HttpProbe + ?Sized> HttpProbe for &P {
    fn get(&self, url: &str) -> Result<u16, ProbeError> {
        (**self).get(url)
    }
}
