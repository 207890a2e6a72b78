//! Security scanner (Clair v4) integration.

use fieldgroup_core::Record;

/// Scanner endpoint and indexing cadence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Record)]
#[record(name = "SecurityScannerFieldGroup")]
pub struct SecurityScannerFieldGroup {
    /// Enables image scanning.
    pub feature_security_scanner: bool,
    /// Scanner base URL; must answer `200` when set.
    #[field(omit_empty, reachable)]
    pub security_scanner_v4_endpoint: String,
    /// Pre-shared key used to sign scanner requests.
    pub security_scanner_v4_psk: String,
    /// Seconds between indexing passes.
    #[field(default = 30)]
    pub security_scanner_indexing_interval: i64,
    /// Emit notifications for new vulnerabilities.
    pub security_scanner_notifications: bool,
}
