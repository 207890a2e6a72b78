//! CLI binary entrypoint.

mod commands;
mod error;
mod format;

use clap::{Parser, Subcommand};
use commands::{CheckCommandInput, run_check, run_groups, run_show};
use error::{CliError, ExitCode};
use fieldgroup_config::FieldGroupRegistry;
use fieldgroup_shared::ErrorEnvelope;
use format::{OutputArgs, OutputMode};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Switches log events on stderr to the JSON formatter.
const ENV_LOG_JSON: &str = "FIELDGROUP_LOG_JSON";

#[derive(Debug, Parser)]
#[command(
    name = "fieldgroup",
    version,
    about = "Materialize and validate config field groups",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the registered field groups and their fields.
    Groups,
    /// Materialize and validate field groups from a config document.
    Check {
        /// YAML or JSON config document.
        #[arg(long)]
        config: PathBuf,
        /// Group to check; repeat for several. Defaults to all groups.
        #[arg(long = "group")]
        groups: Vec<String>,
        /// Skip reachability probes.
        #[arg(long)]
        no_probe: bool,
    },
    /// Print the effective, redacted record of one field group.
    Show {
        /// YAML or JSON config document.
        #[arg(long)]
        config: PathBuf,
        /// Group to print.
        #[arg(long)]
        group: String,
    },
}

pub(crate) struct CliOutput {
    stdout: String,
    stderr: String,
    exit_code: ExitCode,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing();
    let mode = OutputMode::from_args(&cli.output);

    match run(&cli.command, mode) {
        Ok(output) => match write_output(&output) {
            Ok(()) => std::process::ExitCode::from(output.exit_code.as_u8()),
            Err(error) => exit_with_error(&error),
        },
        Err(error) => exit_with_error(&error),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);
    // A subscriber may already be installed; keep it.
    let _ = if env_bool(ENV_LOG_JSON) {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .try_init()
    };
}

fn env_bool(name: &str) -> bool {
    std::env::var(name).is_ok_and(|value| parse_flag(&value))
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn exit_with_error(error: &CliError) -> std::process::ExitCode {
    let _ = writeln!(io::stderr(), "error: {error}");
    std::process::ExitCode::from(error.exit_code().as_u8())
}

fn run(command: &Commands, mode: OutputMode) -> Result<CliOutput, CliError> {
    let registry = FieldGroupRegistry::builtin();
    match command {
        Commands::Groups => run_groups(mode, &registry),
        Commands::Check {
            config,
            groups,
            no_probe,
        } => run_check(
            mode,
            &registry,
            CheckCommandInput {
                config,
                groups,
                no_probe: *no_probe,
            },
        ),
        Commands::Show { config, group } => run_show(mode, &registry, config, group),
    }
}

pub(crate) fn format_error_output(mode: OutputMode, error: &ErrorEnvelope) -> CliOutput {
    let mut stderr = String::new();
    log_info(&mut stderr, "command failed", mode.quiet);

    let stdout = if mode.is_json() {
        let payload = serde_json::json!({
            "status": "error",
            "error": {
                "code": error.code.to_string(),
                "kind": error.kind.to_string(),
                "message": error.message,
                "metadata": error.metadata,
            },
        });

        // This is a CLI boundary, so JSON serialization errors are internal.
        let mut output = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| {
            "{\"status\":\"error\",\"error\":{\"code\":\"core:internal\",\"message\":\"internal error\"}}".to_owned()
        });
        output.push('\n');
        output
    } else {
        format_error_text(error)
    };

    CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::for_envelope(error),
    }
}

fn format_error_text(error: &ErrorEnvelope) -> String {
    let mut out = String::new();
    out.push_str("status: error\n");
    out.push_str("code: ");
    out.push_str(&error.code.to_string());
    out.push('\n');
    out.push_str("message: ");
    out.push_str(&error.message);
    out.push('\n');
    for (key, value) in &error.metadata {
        out.push_str(key);
        out.push_str(": ");
        out.push_str(value);
        out.push('\n');
    }
    out
}

pub(crate) fn log_info(stderr: &mut String, message: &str, quiet: bool) {
    if quiet {
        return;
    }
    stderr.push_str("info: ");
    stderr.push_str(message);
    stderr.push('\n');
}

fn write_output(output: &CliOutput) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    stdout.write_all(output.stdout.as_bytes())?;

    if !output.stderr.is_empty() {
        let mut stderr = io::stderr();
        stderr.write_all(output.stderr.as_bytes())?;
        stderr.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::OutputFormat;
    use clap::CommandFactory;
    use fieldgroup_shared::ErrorCode;

    #[test]
    fn version_flag_is_supported() {
        let result = Cli::command().try_get_matches_from(["fieldgroup", "--version"]);
        let is_version = matches!(
            result,
            Err(error) if error.kind() == clap::error::ErrorKind::DisplayVersion
        );

        assert!(is_version, "expected clap to render version");
    }

    #[test]
    fn check_accepts_repeated_groups() -> Result<(), Box<dyn std::error::Error>> {
        let cli = Cli::try_parse_from([
            "fieldgroup",
            "--output",
            "json",
            "check",
            "--config",
            "config.yaml",
            "--group",
            "elasticsearch",
            "--group",
            "security_scanner",
            "--no-probe",
        ])?;

        assert!(OutputMode::from_args(&cli.output).is_json());
        let Commands::Check {
            groups, no_probe, ..
        } = cli.command
        else {
            return Err("expected check command".into());
        };
        assert_eq!(groups, vec!["elasticsearch", "security_scanner"]);
        assert!(no_probe);
        Ok(())
    }

    #[test]
    fn show_requires_a_group() {
        let result = Cli::try_parse_from(["fieldgroup", "show", "--config", "config.yaml"]);
        assert!(result.is_err());
    }

    #[test]
    fn exit_codes_for_errors() -> Result<(), Box<dyn std::error::Error>> {
        let io_error = CliError::Io(io::Error::other("io"));
        let serialization_error = match serde_json::from_str::<serde_json::Value>("not-json") {
            Ok(_) => return Err("expected serialization error".into()),
            Err(error) => CliError::Serialization(error),
        };

        assert_eq!(io_error.exit_code(), ExitCode::Io);
        assert_eq!(serialization_error.exit_code(), ExitCode::Internal);
        Ok(())
    }

    #[test]
    fn envelope_exit_codes() {
        let not_found = ErrorEnvelope::from(io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(ExitCode::for_envelope(&not_found), ExitCode::Io);

        let unknown = ErrorEnvelope::expected(ErrorCode::new("config", "unknown_field_group"), "x");
        assert_eq!(ExitCode::for_envelope(&unknown), ExitCode::InvalidInput);

        let invariant = ErrorEnvelope::invariant(ErrorCode::internal(), "broken");
        assert_eq!(ExitCode::for_envelope(&invariant), ExitCode::Internal);
    }

    #[test]
    fn error_output_text_and_json() -> Result<(), Box<dyn std::error::Error>> {
        let error = ErrorEnvelope::expected(
            ErrorCode::new("config", "unsupported_format"),
            "unsupported config format",
        )
        .with_metadata("extension", "toml");

        let text = format_error_output(
            OutputMode {
                format: OutputFormat::Text,
                quiet: true,
            },
            &error,
        );
        assert_eq!(
            text.stdout,
            "status: error\ncode: config:unsupported_format\nmessage: unsupported config format\nextension: toml\n"
        );
        assert!(text.stderr.is_empty());
        assert_eq!(text.exit_code, ExitCode::InvalidInput);

        let json = format_error_output(
            OutputMode {
                format: OutputFormat::Json,
                quiet: false,
            },
            &error,
        );
        let value: serde_json::Value = serde_json::from_str(&json.stdout)?;
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"]["code"], "config:unsupported_format");
        assert_eq!(value["error"]["metadata"]["extension"], "toml");
        assert_eq!(json.stderr, "info: command failed\n");
        Ok(())
    }

    #[test]
    fn log_flag_parsing() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" 1 "));
        assert!(!parse_flag("off"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn log_info_respects_quiet() {
        let mut stderr = String::new();
        log_info(&mut stderr, "message", true);
        assert!(stderr.is_empty());
    }
}
