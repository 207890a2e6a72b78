//! Action-log rotation and archiving.

use fieldgroup_core::{OpenMap, Record};

/// Rotation schedule plus the storage location archives are written to.
#[derive(Debug, Clone, Default, PartialEq, Record)]
#[record(name = "ActionLogArchivingFieldGroup")]
pub struct ActionLogArchivingFieldGroup {
    /// Enables periodic rotation of action logs.
    pub feature_action_log_rotation: bool,
    /// Must name an entry of `distributed_storage_config`.
    #[field(omit_empty, found_in = "distributed_storage_config")]
    pub action_log_archive_location: String,
    /// Path inside the storage location.
    pub action_log_archive_path: String,
    /// Age after which logs rotate, e.g. `30d`.
    #[field(omit_empty, duration)]
    pub action_log_rotation_threshold: String,
    /// Named storage engines, keyed by location name.
    pub distributed_storage_config: OpenMap,
}
