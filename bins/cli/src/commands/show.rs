//! Show command handler.

use crate::error::{CliError, ExitCode};
use crate::format::OutputMode;
use crate::{CliOutput, format_error_output};
use fieldgroup_config::{FieldGroupRegistry, GroupReport, load_document_from_path, redact_document};
use fieldgroup_core::Validator;
use std::path::Path;

/// Run the show command.
///
/// Prints the effective record of one group with secrets redacted. Field
/// errors become warnings on stderr and a non-zero exit code; rules are not
/// reported here.
pub fn run_show(
    mode: OutputMode,
    registry: &FieldGroupRegistry,
    config: &Path,
    group: &str,
) -> Result<CliOutput, CliError> {
    if let Err(error) = registry.select(&[group]) {
        return Ok(format_error_output(mode, &error));
    }
    let document = match load_document_from_path(config) {
        Ok(document) => document,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };
    let report = match registry.check(group, &document, &Validator::offline()) {
        Ok(report) => report,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let stdout = if mode.is_json() {
        format_show_json(&report)?
    } else {
        format_show_text(&report)?
    };

    let mut stderr = String::new();
    for error in &report.errors {
        stderr.push_str("warning: ");
        stderr.push_str(&error.to_string());
        stderr.push('\n');
    }

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: if report.errors.is_empty() {
            ExitCode::Ok
        } else {
            ExitCode::InvalidInput
        },
    })
}

fn format_show_json(report: &GroupReport) -> Result<String, CliError> {
    let payload = serde_json::json!({
        "status": if report.errors.is_empty() { "ok" } else { "invalid" },
        "group": report.group,
        "effective": redact_document(&report.effective),
        "errors": report.errors,
    });
    let mut out = serde_json::to_string_pretty(&payload)?;
    out.push('\n');
    Ok(out)
}

fn format_show_text(report: &GroupReport) -> Result<String, CliError> {
    let mut out = String::new();
    out.push_str("# group: ");
    out.push_str(report.group);
    out.push('\n');
    out.push_str(&serde_yaml_ng::to_string(&redact_document(&report.effective))?);
    Ok(out)
}
