//! Result alias for envelope-returning APIs.

use crate::errors::ErrorEnvelope;

/// Result type used at crate boundaries across the workspace.
pub type Result<T, E = ErrorEnvelope> = std::result::Result<T, E>;
