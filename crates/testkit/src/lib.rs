//! # fieldgroup-testkit
//!
//! Test doubles and fixtures.
//! This crate depends on `core` only.

pub mod fixtures;
pub mod probe;

pub use probe::ScriptedProbe;

/// Returns the testkit crate version.
#[must_use]
pub const fn testkit_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
