//! Access to the on-disk fixtures under `crates/testkit/fixtures`.

use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// Root directory of the fixture tree.
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Absolute path of a fixture, e.g. `groups/full.valid.yaml`.
pub fn fixture_path(relative: &str) -> PathBuf {
    fixtures_dir().join(relative)
}

/// Read a fixture as text.
pub fn read_fixture(relative: &str) -> std::io::Result<String> {
    fs::read_to_string(fixture_path(relative))
}

/// Read a JSON object of env var names to values.
pub fn read_env_fixture(relative: &str) -> Result<BTreeMap<String, String>, Box<dyn Error>> {
    let contents = read_fixture(relative)?;
    Ok(serde_json::from_str(&contents)?)
}
