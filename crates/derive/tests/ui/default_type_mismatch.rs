use fieldgroup_core::Record;

#[derive(Record)]
struct KafkaConfig {
    #[field(default = "thirty")]
    max_block_seconds: i64,
}

fn main() {}
