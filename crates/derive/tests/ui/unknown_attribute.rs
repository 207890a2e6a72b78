use fieldgroup_core::Record;

#[derive(Record)]
struct KafkaConfig {
    #[field(required)]
    topic: String,
}

fn main() {}
