//! Schema-driven construction of typed records from documents.

use crate::error::FieldError;
use crate::path::FieldPath;
use crate::record::{Record, RecordView};
use crate::value::Document;

/// A fully populated record plus every field error met while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct Materialization<R> {
    /// The record. Fields whose input was absent or rejected hold their defaults.
    pub record: R,
    /// Errors in schema field order, depth first.
    pub errors: Vec<FieldError>,
}

impl<R> Materialization<R> {
    /// True when no field was rejected.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Splits into record and errors.
    #[must_use]
    pub fn into_parts(self) -> (R, Vec<FieldError>) {
        (self.record, self.errors)
    }
}

/// Returns `R` with every schema default applied.
///
/// Defaults are rebuilt on every call; no instance is shared between calls.
#[must_use]
pub fn defaults<R: Record>() -> R {
    let mut record = R::default();
    for field in R::record_schema().fields {
        if let Some(slot) = record.slot_mut(field.key) {
            slot.apply_default(&field.default);
        }
    }
    record
}

/// Builds `R` from a normalized document.
///
/// Absent keys keep their defaults silently. Unknown keys are ignored. A
/// present value of the wrong type is reported and the default is kept.
#[must_use]
pub fn materialize<R: Record>(document: &Document) -> Materialization<R> {
    let mut errors = Vec::new();
    let record = materialize_at::<R>(document, &FieldPath::root(), &mut errors);
    tracing::debug!(
        record = R::record_schema().name,
        keys = document.len(),
        errors = errors.len(),
        "materialized record"
    );
    Materialization { record, errors }
}

pub(crate) fn materialize_at<R: Record>(
    document: &Document,
    base: &FieldPath,
    errors: &mut Vec<FieldError>,
) -> R {
    let mut record = defaults::<R>();
    for field in R::record_schema().fields {
        let Some(value) = document.get(field.key) else {
            continue;
        };
        if let Some(slot) = record.slot_mut(field.key) {
            slot.merge(value, &base.key(field.key), errors);
        }
    }
    record
}

/// Serializes a record back to a document.
///
/// Absent nested records are omitted, so the output materializes back to an
/// identical record.
#[must_use]
pub fn to_document(record: &dyn RecordView) -> Document {
    let schema = record.schema();
    let mut document = Document::new();
    for field in schema.fields {
        let Some(value) = record.field(field.key).and_then(|view| view.to_value()) else {
            continue;
        };
        document.insert(field.key.to_owned(), value);
    }
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{RawMap, Value};
    use crate::{FieldErrorKind, OpenMap, Record, ValueKind};

    #[derive(Debug, Clone, Default, PartialEq, Record)]
    struct Broker {
        #[field(default = "localhost")]
        host: String,
        #[field(default = 9092)]
        port: i64,
    }

    #[derive(Debug, Clone, Default, PartialEq, Record)]
    #[record(name = "Cluster")]
    struct Cluster {
        #[field(default = "primary")]
        name: String,
        #[field(default = true)]
        enabled: bool,
        #[field(default = 1.5)]
        ratio: f64,
        brokers: Vec<Broker>,
        tags: Vec<String>,
        leader: Option<Broker>,
        settings: OpenMap,
        #[field(key = "extra")]
        anything: Value,
    }

    fn document(map: RawMap) -> Document {
        crate::normalize(&map).unwrap_or_default()
    }

    #[test]
    fn empty_document_yields_defaults() {
        let result = materialize::<Cluster>(&Document::new());
        assert!(result.is_clean());
        assert_eq!(result.record.name, "primary");
        assert!(result.record.enabled);
        assert!((result.record.ratio - 1.5).abs() < f64::EPSILON);
        assert!(result.record.leader.is_none());
        assert!(result.record.brokers.is_empty());
        assert_eq!(result.record.anything, Value::Null);
    }

    #[test]
    fn present_values_override_defaults() {
        let leader = RawMap::new().with("host", "kafka-1").with("port", 19092_i64);
        let doc = document(
            RawMap::new()
                .with("name", "logs")
                .with("enabled", false)
                .with("ratio", 2_i64)
                .with("leader", Value::Map(leader))
                .with("tags", Value::Seq(vec!["a".into(), "b".into()])),
        );
        let (record, errors) = materialize::<Cluster>(&doc).into_parts();

        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(record.name, "logs");
        assert!(!record.enabled);
        assert!((record.ratio - 2.0).abs() < f64::EPSILON);
        assert_eq!(
            record.leader,
            Some(Broker {
                host: "kafka-1".to_owned(),
                port: 19092
            })
        );
        assert_eq!(record.tags, vec!["a".to_owned(), "b".to_owned()]);
    }

    #[test]
    fn nested_records_get_their_own_defaults() {
        let doc = document(RawMap::new().with("leader", Value::Map(RawMap::new())));
        let record = materialize::<Cluster>(&doc).record;
        assert_eq!(
            record.leader,
            Some(Broker {
                host: "localhost".to_owned(),
                port: 9092
            })
        );
    }

    #[test]
    fn wrong_types_keep_defaults_and_are_reported() {
        let doc = document(
            RawMap::new()
                .with("name", 5_i64)
                .with("enabled", "yes")
                .with("leader", "not a map"),
        );
        let result = materialize::<Cluster>(&doc);

        assert_eq!(result.record.name, "primary");
        assert!(result.record.enabled);
        assert!(result.record.leader.is_none());
        let rendered: Vec<String> = result.errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "name must be of type string",
                "enabled must be of type bool",
                "leader must be of type map",
            ]
        );
    }

    #[test]
    fn nested_errors_carry_parent_path() {
        let leader = RawMap::new().with("port", "9092");
        let doc = document(RawMap::new().with("leader", Value::Map(leader)));
        let result = materialize::<Cluster>(&doc);

        let rendered: Vec<String> = result.errors.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["leader.port must be of type int"]);
        assert_eq!(
            result.record.leader.map(|leader| leader.port),
            Some(9092),
            "nested default survives a rejected value"
        );
    }

    #[test]
    fn sequence_element_errors_are_indexed_and_keep_default() {
        let doc = document(RawMap::new().with(
            "tags",
            Value::Seq(vec!["ok".into(), Value::Int(1), Value::Bool(true)]),
        ));
        let result = materialize::<Cluster>(&doc);

        assert!(result.record.tags.is_empty());
        let paths: Vec<String> = result.errors.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(paths, vec!["tags[1]", "tags[2]"]);
    }

    #[test]
    fn records_inside_sequences_are_materialized() {
        let doc = document(RawMap::new().with(
            "brokers",
            Value::Seq(vec![
                Value::Map(RawMap::new().with("host", "a")),
                Value::Map(RawMap::new().with("port", 1_i64)),
            ]),
        ));
        let record = materialize::<Cluster>(&doc).record;
        let ports: Vec<i64> = record.brokers.iter().map(|broker| broker.port).collect();
        let hosts: Vec<&str> = record.brokers.iter().map(|broker| broker.host.as_str()).collect();
        assert_eq!(ports, vec![9092, 1]);
        assert_eq!(hosts, vec!["a", "localhost"]);
    }

    #[test]
    fn nested_key_collision_is_a_structural_error() {
        let leader = RawMap::new().with(1_i64, "x").with("1", "y");
        let doc = document(RawMap::new().with("leader", Value::Map(leader)));
        let result = materialize::<Cluster>(&doc);

        assert!(result.record.leader.is_none());
        assert!(matches!(
            result.errors.first().map(|error| &error.kind),
            Some(FieldErrorKind::Normalization(_))
        ));
    }

    #[test]
    fn open_map_values_are_verbatim() {
        let nested = RawMap::new().with(1_i64, "kept");
        let settings = RawMap::new()
            .with("shards", 3_i64)
            .with("nested", Value::Map(nested.clone()));
        let doc = document(RawMap::new().with("settings", Value::Map(settings)));
        let record = materialize::<Cluster>(&doc).record;

        assert_eq!(record.settings.get("shards"), Some(&Value::Int(3)));
        assert_eq!(record.settings.get("nested"), Some(&Value::Map(nested)));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let doc = document(RawMap::new().with("not_a_field", 1_i64));
        assert!(materialize::<Cluster>(&doc).is_clean());
    }

    #[test]
    fn wrong_type_reports_found_kind() {
        let doc = document(RawMap::new().with("tags", "a,b"));
        let result = materialize::<Cluster>(&doc);
        assert!(matches!(
            result.errors.first().map(|error| &error.kind),
            Some(FieldErrorKind::WrongType {
                expected: "sequence",
                found: ValueKind::String
            })
        ));
    }

    #[test]
    fn to_document_round_trips() {
        let leader = RawMap::new().with("host", "kafka-1");
        let doc = document(
            RawMap::new()
                .with("name", "logs")
                .with("leader", Value::Map(leader))
                .with("extra", Value::Seq(vec![Value::Null])),
        );
        let first = materialize::<Cluster>(&doc).record;
        let second = materialize::<Cluster>(&to_document(&first));

        assert!(second.is_clean());
        assert_eq!(second.record, first);
    }

    #[test]
    fn absent_records_are_omitted_from_documents() {
        let record = defaults::<Cluster>();
        let doc = to_document(&record);
        assert!(!doc.contains_key("leader"));
        assert_eq!(doc.get("name"), Some(&Value::from("primary")));
    }
}
