use fieldgroup_core::Record;

#[derive(Record)]
struct RotationConfig {
    #[field(duration)]
    threshold: i64,
}

fn main() {}
