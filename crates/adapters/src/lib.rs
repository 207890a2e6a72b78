//! # fieldgroup-adapters
//!
//! Concrete implementations of the seams declared in `fieldgroup-core`.
//! Today that is the blocking HTTP probe behind the `reachable` rule.

#[cfg(feature = "http-probe")]
pub mod probe;

#[cfg(feature = "http-probe")]
pub use probe::{ReqwestProbe, ReqwestProbeConfig};

/// Returns the adapters crate version.
#[must_use]
pub const fn adapters_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
