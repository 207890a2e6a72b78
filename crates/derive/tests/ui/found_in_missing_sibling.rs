use fieldgroup_core::Record;

#[derive(Record)]
struct ArchivingConfig {
    #[field(found_in = "storage_locations")]
    archive_location: String,
}

fn main() {}
