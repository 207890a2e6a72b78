//! Groups command handler.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::OutputMode;
use fieldgroup_config::FieldGroupRegistry;
use fieldgroup_core::RecordSchema;

/// Run the groups command.
pub fn run_groups(mode: OutputMode, registry: &FieldGroupRegistry) -> Result<CliOutput, CliError> {
    let stdout = if mode.is_json() {
        format_groups_json(registry)?
    } else {
        format_groups_text(registry)
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}

fn format_groups_json(registry: &FieldGroupRegistry) -> Result<String, CliError> {
    let groups: Vec<serde_json::Value> = registry
        .iter()
        .map(|group| {
            serde_json::json!({
                "name": group.name(),
                "schema": schema_json(group.schema()),
            })
        })
        .collect();
    let payload = serde_json::json!({
        "status": "ok",
        "groups": groups,
    });
    let mut out = serde_json::to_string_pretty(&payload)?;
    out.push('\n');
    Ok(out)
}

// `RecordSchema` serializes nested records by name only; expand them here.
fn schema_json(schema: &RecordSchema) -> serde_json::Value {
    let fields: Vec<serde_json::Value> = schema
        .fields
        .iter()
        .map(|field| {
            let mut entry = serde_json::json!({
                "key": field.key,
                "kind": field.kind.to_string(),
                "default": field.default.to_string(),
                "rules": field.rules.iter().map(ToString::to_string).collect::<Vec<_>>(),
                "omit_empty": field.omit_empty,
            });
            if let (Some(nested), Some(object)) = (field.kind.record_schema(), entry.as_object_mut())
            {
                object.insert("record".to_owned(), schema_json(nested));
            }
            entry
        })
        .collect();
    serde_json::json!({
        "name": schema.name,
        "fields": fields,
    })
}

fn format_groups_text(registry: &FieldGroupRegistry) -> String {
    let mut out = String::new();
    out.push_str("status: ok\n");
    for group in registry.iter() {
        out.push_str("group: ");
        out.push_str(group.name());
        out.push_str(" (");
        out.push_str(group.schema().name);
        out.push_str(")\n");
        write_schema_text(&mut out, group.schema(), 1);
    }
    out
}

fn write_schema_text(out: &mut String, schema: &RecordSchema, depth: usize) {
    for field in schema.fields {
        out.push_str(&"  ".repeat(depth));
        out.push_str(field.key);
        out.push_str(": ");
        out.push_str(&field.kind.to_string());
        out.push_str(" = ");
        out.push_str(&field.default.to_string());
        if !field.rules.is_empty() {
            let rules: Vec<String> = field.rules.iter().map(ToString::to_string).collect();
            out.push_str(" [");
            out.push_str(&rules.join(", "));
            out.push(']');
        }
        if field.omit_empty {
            out.push_str(" (omit_empty)");
        }
        out.push('\n');
        if let Some(nested) = field.kind.record_schema() {
            write_schema_text(out, nested, depth + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::OutputFormat;

    fn mode(format: OutputFormat) -> OutputMode {
        OutputMode {
            format,
            quiet: true,
        }
    }

    #[test]
    fn text_lists_nested_fields_and_rules() -> Result<(), Box<dyn std::error::Error>> {
        let output = run_groups(mode(OutputFormat::Text), &FieldGroupRegistry::builtin())?;

        assert_eq!(output.exit_code, ExitCode::Ok);
        assert!(output.stdout.starts_with("status: ok\n"));
        assert!(
            output
                .stdout
                .contains("group: elasticsearch (ElasticSearchFieldGroup)")
        );
        assert!(output.stdout.contains("  logs_model: string = \"database\"\n"));
        assert!(output.stdout.contains("      bootstrap_servers: sequence<any>"));
        assert!(
            output
                .stdout
                .contains("action_log_rotation_threshold: string = - [duration] (omit_empty)")
        );
        Ok(())
    }

    #[test]
    fn json_expands_nested_records() -> Result<(), Box<dyn std::error::Error>> {
        let output = run_groups(mode(OutputFormat::Json), &FieldGroupRegistry::builtin())?;
        let value: serde_json::Value = serde_json::from_str(&output.stdout)?;

        let groups = value["groups"]
            .as_array()
            .ok_or_else(|| std::io::Error::other("groups missing"))?;
        let names: Vec<&str> = groups.iter().filter_map(|group| group["name"].as_str()).collect();
        assert_eq!(
            names,
            vec!["action_log_archiving", "elasticsearch", "security_scanner"]
        );

        let es = &groups[1]["schema"]["fields"];
        assert_eq!(es[1]["key"], "logs_model_config");
        assert_eq!(es[1]["record"]["name"], "LogsModelConfig");
        Ok(())
    }
}
