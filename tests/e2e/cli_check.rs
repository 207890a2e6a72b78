//! End-to-end checks of the `fieldgroup` binary against the testkit fixtures.

use fieldgroup_testkit::fixtures::fixture_path;
use std::error::Error;
use std::process::{Command, Output};

fn fieldgroup(args: &[&str]) -> Result<Output, Box<dyn Error>> {
    let output = Command::new(env!("CARGO_BIN_EXE_fieldgroup"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("FIELDGROUP_PROBE_ENABLED")
        .env_remove("FIELDGROUP_PROBE_TIMEOUT_MS")
        .output()?;
    Ok(output)
}

fn fixture(relative: &str) -> String {
    fixture_path(relative).display().to_string()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn valid_config_passes_without_probes() -> Result<(), Box<dyn Error>> {
    let config = fixture("groups/full.valid.yaml");
    let output = fieldgroup(&["check", "--config", &config, "--no-probe"])?;

    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.starts_with("status: ok\n"), "{text}");
    assert!(text.contains("skipped: security_scanner_v4_endpoint (reachable)"));
    Ok(())
}

#[test]
fn invalid_config_exits_with_two() -> Result<(), Box<dyn Error>> {
    let config = fixture("groups/full.invalid.yaml");
    let output = fieldgroup(&["check", "--config", &config, "--no-probe"])?;

    assert_eq!(output.status.code(), Some(2));
    let text = stdout(&output);
    assert!(text.contains("error: logs_model must be of type string"));
    assert!(text.contains("failed: action_log_rotation_threshold (duration)"));
    Ok(())
}

#[test]
fn missing_config_exits_with_three() -> Result<(), Box<dyn Error>> {
    let config = fixture("groups/missing.yaml");
    let output = fieldgroup(&["--output", "json", "check", "--config", &config])?;

    assert_eq!(output.status.code(), Some(3));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["status"], "error");
    assert_eq!(value["error"]["code"], "core:not_found");
    Ok(())
}

#[test]
fn unknown_group_exits_with_two() -> Result<(), Box<dyn Error>> {
    let config = fixture("groups/full.valid.yaml");
    let output = fieldgroup(&["check", "--config", &config, "--group", "ldap"])?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).contains("code: config:unknown_field_group"));
    Ok(())
}

#[test]
fn disabled_probe_env_skips_reachability() -> Result<(), Box<dyn Error>> {
    let config = fixture("groups/full.valid.yaml");
    let output = Command::new(env!("CARGO_BIN_EXE_fieldgroup"))
        .args(["--output", "json", "check", "--config", &config])
        .args(["--group", "security_scanner"])
        .env("FIELDGROUP_PROBE_ENABLED", "false")
        .output()?;

    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let skipped = &value["groups"][0]["validation"]["skipped"][0];
    assert_eq!(skipped["rule"], "reachable");
    Ok(())
}

#[test]
fn malformed_probe_env_is_invalid_input() -> Result<(), Box<dyn Error>> {
    let config = fixture("groups/full.valid.yaml");
    let output = Command::new(env!("CARGO_BIN_EXE_fieldgroup"))
        .args(["check", "--config", &config])
        .env("FIELDGROUP_PROBE_TIMEOUT_MS", "soon")
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).contains("code: config:invalid_env_int"));
    Ok(())
}

#[test]
fn show_redacts_secrets() -> Result<(), Box<dyn Error>> {
    let config = fixture("groups/kinesis.yaml");
    let output = fieldgroup(&["show", "--config", &config, "--group", "elasticsearch"])?;

    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(!text.contains("example-secret"), "{text}");
    assert!(!text.contains("AKIAEXAMPLE"), "{text}");
    assert!(text.contains("stream_name: quay-logs"));
    Ok(())
}

#[test]
fn groups_lists_builtin_groups_as_json() -> Result<(), Box<dyn Error>> {
    let output = fieldgroup(&["--output", "json", "groups"])?;

    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let names: Vec<&str> = value["groups"]
        .as_array()
        .ok_or_else(|| std::io::Error::other("groups missing"))?
        .iter()
        .filter_map(|group| group["name"].as_str())
        .collect();
    assert_eq!(
        names,
        vec!["action_log_archiving", "elasticsearch", "security_scanner"]
    );
    Ok(())
}
