//! Action-log storage backend settings (`logs_model` and its nested config).

use fieldgroup_core::{OpenMap, Record, Value};
use std::fmt;

/// Where action logs are written and how the producer is configured.
#[derive(Debug, Clone, Default, PartialEq, Record)]
#[record(name = "ElasticSearchFieldGroup")]
pub struct ElasticSearchFieldGroup {
    /// Storage model name (`database`, `elasticsearch`, ...).
    #[field(default = "database")]
    pub logs_model: String,
    /// Backend settings; absent unless the document provides them.
    pub logs_model_config: Option<LogsModelConfig>,
}

impl ElasticSearchFieldGroup {
    /// Typed view of [`Self::logs_model`].
    #[must_use]
    pub fn logs_model(&self) -> LogsModel {
        LogsModel::parse(&self.logs_model)
    }
}

/// Producer selection plus one config block per producer.
#[derive(Debug, Clone, Default, PartialEq, Record)]
#[record(name = "LogsModelConfig")]
pub struct LogsModelConfig {
    /// Elasticsearch connection.
    pub elasticsearch_config: Option<ElasticsearchConfig>,
    /// Kinesis stream producer.
    pub kinesis_stream_config: Option<KinesisStreamConfig>,
    /// Producer name (`elasticsearch`, `kafka`, `kinesis_stream`).
    pub producer: String,
    /// Kafka producer.
    pub kafka_config: Option<KafkaConfig>,
}

impl LogsModelConfig {
    /// Typed view of [`Self::producer`].
    #[must_use]
    pub fn producer_kind(&self) -> Producer {
        match self.producer.as_str() {
            "elasticsearch" => Producer::Elasticsearch,
            "kafka" => Producer::Kafka,
            "kinesis_stream" => Producer::KinesisStream,
            _ => Producer::Other,
        }
    }
}

/// Kafka producer settings.
#[derive(Debug, Clone, Default, PartialEq, Record)]
#[record(name = "KafkaConfig")]
pub struct KafkaConfig {
    /// Topic receiving log entries.
    pub topic: String,
    /// Broker entries, usually `host:port`. Elements are passed through
    /// untyped.
    pub bootstrap_servers: Vec<Value>,
    /// Producer send blocking bound.
    pub max_block_seconds: i64,
}

/// Kinesis producer settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Record)]
#[record(name = "KinesisStreamConfig")]
pub struct KinesisStreamConfig {
    /// Connection pool size.
    pub max_pool_connections: i64,
    /// AWS region of the stream.
    pub aws_region: String,
    /// Connect timeout in seconds.
    pub connect_timeout: i64,
    /// AWS secret access key.
    pub aws_secret_key: String,
    /// Stream name.
    pub stream_name: String,
    /// AWS access key id.
    pub aws_access_key: String,
    /// Retry count for failed puts.
    pub retries: i64,
    /// Read timeout in seconds.
    pub read_timeout: i64,
}

/// Elasticsearch connection settings.
#[derive(Debug, Clone, Default, PartialEq, Record)]
#[record(name = "ElasticsearchConfig")]
pub struct ElasticsearchConfig {
    /// AWS region, for hosted Elasticsearch.
    pub aws_region: String,
    /// Server port.
    pub port: i64,
    /// Access key for hosted Elasticsearch.
    pub access_key: String,
    /// Server host name.
    pub host: String,
    /// Prefix of every log index name.
    #[field(default = "logentry_")]
    pub index_prefix: String,
    /// Passed through to the index template untouched.
    pub index_settings: OpenMap,
    /// Connect over TLS.
    #[field(default = true)]
    pub use_ssl: bool,
    /// Secret key for hosted Elasticsearch.
    pub secret_key: String,
}

/// Known `logs_model` values. Unknown values are kept, never rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogsModel {
    /// Logs stay in the relational database.
    Database,
    /// Migration mode: read from both, write to Elasticsearch.
    TransitionReadsBothWritesEs,
    /// Elasticsearch only.
    Elasticsearch,
    /// Splunk.
    Splunk,
    /// Anything else, verbatim.
    Other(String),
}

impl LogsModel {
    fn parse(raw: &str) -> Self {
        match raw {
            "database" => Self::Database,
            "transition_reads_both_writes_es" => Self::TransitionReadsBothWritesEs,
            "elasticsearch" => Self::Elasticsearch,
            "splunk" => Self::Splunk,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for LogsModel {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Database => "database",
            Self::TransitionReadsBothWritesEs => "transition_reads_both_writes_es",
            Self::Elasticsearch => "elasticsearch",
            Self::Splunk => "splunk",
            Self::Other(other) => other,
        })
    }
}

/// Known log producers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Producer {
    /// Direct Elasticsearch writes.
    Elasticsearch,
    /// Kafka topic.
    Kafka,
    /// AWS Kinesis stream.
    KinesisStream,
    /// Empty or unrecognized.
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldgroup_core::{Document, RawMap, defaults, materialize, normalize, to_document};

    fn document(map: RawMap) -> Document {
        normalize(&map).unwrap_or_default()
    }

    #[test]
    fn defaults_match_declarations() {
        let group = defaults::<ElasticSearchFieldGroup>();
        assert_eq!(group.logs_model, "database");
        assert_eq!(group.logs_model(), LogsModel::Database);
        assert!(group.logs_model_config.is_none());

        let es = defaults::<ElasticsearchConfig>();
        assert_eq!(es.index_prefix, "logentry_");
        assert!(es.use_ssl);
        assert_eq!(es.port, 0);
        assert!(es.index_settings.is_empty());
    }

    #[test]
    fn unknown_logs_model_is_kept_without_errors() {
        let result = materialize::<ElasticSearchFieldGroup>(&document(
            RawMap::new().with("logs_model", "splunk_storage"),
        ));
        assert!(result.is_clean());
        assert_eq!(result.record.logs_model, "splunk_storage");
        assert_eq!(
            result.record.logs_model(),
            LogsModel::Other("splunk_storage".to_owned())
        );
        assert!(result.record.logs_model_config.is_none());
    }

    #[test]
    fn nested_producer_config_materializes() {
        let kafka = RawMap::new()
            .with("topic", "logs")
            .with(
                "bootstrap_servers",
                Value::Seq(vec![Value::from("k1:9092"), Value::from("k2:9092")]),
            )
            .with("max_block_seconds", 30_i64);
        let es = RawMap::new()
            .with("host", "es.local")
            .with("port", 9200_i64)
            .with(
                "index_settings",
                Value::Map(RawMap::new().with("number_of_shards", 3_i64)),
            );
        let config = RawMap::new()
            .with("producer", "kafka")
            .with("kafka_config", Value::Map(kafka))
            .with("elasticsearch_config", Value::Map(es));
        let result = materialize::<ElasticSearchFieldGroup>(&document(
            RawMap::new()
                .with("logs_model", "elasticsearch")
                .with("logs_model_config", Value::Map(config)),
        ));

        assert!(result.is_clean(), "{:?}", result.errors);
        let config = result.record.logs_model_config.unwrap_or_default();
        assert_eq!(config.producer_kind(), Producer::Kafka);
        let kafka = config.kafka_config.unwrap_or_default();
        assert_eq!(
            kafka.bootstrap_servers,
            vec![Value::from("k1:9092"), Value::from("k2:9092")]
        );
        assert_eq!(kafka.max_block_seconds, 30);
        let es = config.elasticsearch_config.unwrap_or_default();
        assert_eq!(es.index_prefix, "logentry_");
        assert!(es.use_ssl);
        assert_eq!(
            es.index_settings.get("number_of_shards"),
            Some(&Value::Int(3))
        );
        assert!(config.kinesis_stream_config.is_none());
    }

    #[test]
    fn wrong_types_are_reported_with_full_paths() {
        let kafka = RawMap::new()
            .with("bootstrap_servers", "k1:9092")
            .with("max_block_seconds", "30");
        let config = RawMap::new().with("kafka_config", Value::Map(kafka));
        let result = materialize::<ElasticSearchFieldGroup>(&document(
            RawMap::new()
                .with("logs_model", 5_i64)
                .with("logs_model_config", Value::Map(config)),
        ));

        let messages: Vec<String> = result.errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "logs_model must be of type string",
                "logs_model_config.kafka_config.bootstrap_servers must be of type sequence",
                "logs_model_config.kafka_config.max_block_seconds must be of type int",
            ]
        );
        assert_eq!(result.record.logs_model, "database");
        let kafka = result
            .record
            .logs_model_config
            .and_then(|config| config.kafka_config)
            .unwrap_or_default();
        assert!(kafka.bootstrap_servers.is_empty());
    }

    #[test]
    fn mixed_bootstrap_server_entries_are_kept() {
        let kafka = RawMap::new().with(
            "bootstrap_servers",
            Value::Seq(vec![Value::from("k1"), Value::Int(9092)]),
        );
        let config = RawMap::new().with("kafka_config", Value::Map(kafka));
        let result = materialize::<ElasticSearchFieldGroup>(&document(
            RawMap::new().with("logs_model_config", Value::Map(config)),
        ));

        assert!(result.is_clean(), "{:?}", result.errors);
        let kafka = result
            .record
            .logs_model_config
            .and_then(|config| config.kafka_config)
            .unwrap_or_default();
        assert_eq!(
            kafka.bootstrap_servers,
            vec![Value::from("k1"), Value::Int(9092)]
        );
    }

    #[test]
    fn effective_document_round_trips() {
        let kinesis = RawMap::new()
            .with("stream_name", "audit")
            .with("retries", 3_i64);
        let config = RawMap::new()
            .with("producer", "kinesis_stream")
            .with("kinesis_stream_config", Value::Map(kinesis));
        let first = materialize::<ElasticSearchFieldGroup>(&document(
            RawMap::new().with("logs_model_config", Value::Map(config)),
        ));
        let second = materialize::<ElasticSearchFieldGroup>(&to_document(&first.record));
        assert!(second.is_clean());
        assert_eq!(first.record, second.record);
    }
}
