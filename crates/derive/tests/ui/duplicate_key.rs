use fieldgroup_core::Record;

#[derive(Record)]
struct KafkaConfig {
    topic: String,
    #[field(key = "topic")]
    topic_name: String,
}

fn main() {}
