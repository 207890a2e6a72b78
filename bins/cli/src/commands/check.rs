//! Check command handler.

use crate::error::{CliError, ExitCode};
use crate::format::OutputMode;
use crate::{CliOutput, format_error_output, log_info};
use fieldgroup_adapters::{ReqwestProbe, ReqwestProbeConfig};
use fieldgroup_config::{FieldGroupRegistry, GroupReport, ProbeSettings, load_document_from_path};
use fieldgroup_core::Validator;
use fieldgroup_shared::ErrorEnvelope;
use std::path::Path;

/// Arguments of the check command.
#[derive(Debug, Clone, Copy)]
pub struct CheckCommandInput<'a> {
    /// Config document to check.
    pub config: &'a Path,
    /// Selected group names; empty means all.
    pub groups: &'a [String],
    /// Skip reachability probes regardless of the environment.
    pub no_probe: bool,
}

/// Run the check command.
pub fn run_check(
    mode: OutputMode,
    registry: &FieldGroupRegistry,
    input: CheckCommandInput<'_>,
) -> Result<CliOutput, CliError> {
    let settings = match ProbeSettings::from_std_env() {
        Ok(settings) if input.no_probe => settings.disabled(),
        Ok(settings) => settings,
        Err(error) => return Ok(format_error_output(mode, &ErrorEnvelope::from(error))),
    };

    let probe = if settings.enabled() {
        match ReqwestProbe::new(ReqwestProbeConfig::from_settings(&settings)) {
            Ok(probe) => Some(probe),
            Err(error) => return Ok(format_error_output(mode, &error)),
        }
    } else {
        None
    };
    let validator = match &probe {
        Some(probe) => Validator::with_probe(probe),
        None => Validator::offline(),
    };

    check_with_validator(mode, registry, input, &validator)
}

pub(crate) fn check_with_validator(
    mode: OutputMode,
    registry: &FieldGroupRegistry,
    input: CheckCommandInput<'_>,
    validator: &Validator<'_>,
) -> Result<CliOutput, CliError> {
    let groups = match registry.select(input.groups) {
        Ok(groups) => groups,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };
    let document = match load_document_from_path(input.config) {
        Ok(document) => document,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let mut stderr = String::new();
    if !validator.probes_enabled() {
        log_info(&mut stderr, "reachability probes disabled", mode.quiet);
    }

    let reports: Vec<GroupReport> = groups
        .into_iter()
        .map(|group| group.check(&document, validator))
        .collect();
    let clean = reports.iter().all(GroupReport::is_clean);
    tracing::debug!(
        config = %input.config.display(),
        groups = reports.len(),
        clean,
        "checked config document"
    );

    let stdout = if mode.is_json() {
        format_check_json(input.config, clean, &reports)?
    } else {
        format_check_text(input.config, clean, &reports)
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: if clean {
            ExitCode::Ok
        } else {
            ExitCode::InvalidInput
        },
    })
}

const fn status_label(clean: bool) -> &'static str {
    if clean { "ok" } else { "invalid" }
}

// The effective document is left out: it can carry secrets. `show` prints
// it redacted.
fn format_check_json(
    config: &Path,
    clean: bool,
    reports: &[GroupReport],
) -> Result<String, CliError> {
    let groups: Vec<serde_json::Value> = reports
        .iter()
        .map(|report| {
            serde_json::json!({
                "group": report.group,
                "status": status_label(report.is_clean()),
                "errors": report.errors,
                "validation": report.validation,
            })
        })
        .collect();
    let payload = serde_json::json!({
        "status": status_label(clean),
        "config": config.display().to_string(),
        "groups": groups,
    });
    let mut out = serde_json::to_string_pretty(&payload)?;
    out.push('\n');
    Ok(out)
}

fn format_check_text(config: &Path, clean: bool, reports: &[GroupReport]) -> String {
    let mut out = String::new();
    out.push_str("status: ");
    out.push_str(status_label(clean));
    out.push('\n');
    out.push_str("config: ");
    out.push_str(&config.display().to_string());
    out.push('\n');
    for report in reports {
        out.push_str("group: ");
        out.push_str(report.group);
        out.push_str(" (");
        out.push_str(status_label(report.is_clean()));
        out.push_str(")\n");
        for error in &report.errors {
            out.push_str("  error: ");
            out.push_str(&error.to_string());
            out.push('\n');
        }
        for outcome in report.validation.failures() {
            out.push_str("  failed: ");
            out.push_str(&outcome.path.to_string());
            out.push_str(" (");
            out.push_str(outcome.rule);
            out.push_str(")\n");
        }
        for skipped in report.validation.skipped() {
            out.push_str("  skipped: ");
            out.push_str(&skipped.path.to_string());
            out.push_str(" (");
            out.push_str(skipped.rule);
            out.push_str("): ");
            out.push_str(skipped.reason);
            out.push('\n');
        }
    }
    out
}
