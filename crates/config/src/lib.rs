//! # fieldgroup-config
//!
//! The built-in field groups, the registry that names them, document
//! loading, and the tool's own env-derived settings.
//! This crate depends on `core` and `shared` only.

/// Action-log archiving field group.
pub mod action_log_archiving;
/// Elasticsearch / Kafka / Kinesis logs field group.
pub mod elasticsearch;
/// Environment variable parsing for tool settings.
pub mod env;
/// YAML/JSON document loading.
pub mod load;
/// Field-group registry.
pub mod registry;
/// Redaction and JSON output helpers.
pub mod render;
/// Security scanner field group.
pub mod security_scanner;

pub use action_log_archiving::ActionLogArchivingFieldGroup;
pub use elasticsearch::{
    ElasticSearchFieldGroup, ElasticsearchConfig, KafkaConfig, KinesisStreamConfig, LogsModel,
    LogsModelConfig, Producer,
};
pub use env::{
    DEFAULT_PROBE_TIMEOUT_MS, ENV_PROBE_ENABLED, ENV_PROBE_TIMEOUT_MS, EnvParseError,
    ProbeSettings, ProbeTimeoutMs,
};
pub use load::{DocumentFormat, load_document_from_path, parse_document};
pub use registry::{FieldGroup, FieldGroupRegistry, GroupReport};
pub use render::{redact_document, to_pretty_json};
pub use security_scanner::SecurityScannerFieldGroup;

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
