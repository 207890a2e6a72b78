//! Depth-first rule evaluation over a materialized record.

use crate::path::FieldPath;
use crate::probe::HttpProbe;
use crate::record::{FieldRef, RecordView};
use crate::report::ValidationReport;
use crate::rules::{PredicateInput, check_duration, check_found_in, check_reachable};
use crate::schema::Rule;

/// Evaluates the rules declared on a record tree.
///
/// Without a probe, `reachable` rules are listed as skipped rather than
/// passed or failed.
#[derive(Clone, Copy, Default)]
pub struct Validator<'p> {
    probe: Option<&'p dyn HttpProbe>,
}

impl<'p> Validator<'p> {
    /// Validator that performs no network I/O.
    #[must_use]
    pub const fn offline() -> Self {
        Self { probe: None }
    }

    /// Validator that sends `reachable` checks through `probe`.
    #[must_use]
    pub const fn with_probe(probe: &'p dyn HttpProbe) -> Self {
        Self { probe: Some(probe) }
    }

    /// True when a probe is configured.
    #[must_use]
    pub const fn probes_enabled(&self) -> bool {
        self.probe.is_some()
    }

    /// Walks `root` depth-first in schema order and evaluates every rule.
    ///
    /// Evaluation never stops early and never mutates the record.
    pub fn validate(&self, root: &dyn RecordView) -> ValidationReport {
        let mut report = ValidationReport::default();
        self.walk(root, root, &FieldPath::root(), &mut report);
        tracing::debug!(
            record = root.schema().name,
            evaluated = report.len(),
            skipped = report.skipped().len(),
            valid = report.is_valid(),
            "validated record"
        );
        report
    }

    fn walk(
        &self,
        record: &dyn RecordView,
        root: &dyn RecordView,
        base: &FieldPath,
        report: &mut ValidationReport,
    ) {
        for field in record.schema().fields {
            let Some(value) = record.field(field.key) else {
                continue;
            };
            let path = base.key(field.key);

            if !(field.omit_empty && value.is_empty()) {
                let input = PredicateInput {
                    value,
                    parent: record,
                    root,
                    path: &path,
                };
                for rule in field.rules {
                    self.evaluate(rule, &input, report);
                }
            }

            self.descend(value, root, &path, report);
        }
    }

    fn descend(
        &self,
        value: FieldRef<'_>,
        root: &dyn RecordView,
        path: &FieldPath,
        report: &mut ValidationReport,
    ) {
        match value {
            FieldRef::Record(Some(nested)) => self.walk(nested, root, path, report),
            FieldRef::Sequence(items) => {
                for index in 0..items.len() {
                    if let Some(FieldRef::Record(Some(nested))) = items.get(index) {
                        self.walk(nested, root, &path.index(index), report);
                    }
                }
            },
            _ => {},
        }
    }

    fn evaluate(&self, rule: &Rule, input: &PredicateInput<'_>, report: &mut ValidationReport) {
        let passed = match rule {
            Rule::Duration => check_duration(input),
            Rule::FoundIn { field } => check_found_in(input, field),
            Rule::Reachable => {
                let Some(probe) = self.probe else {
                    tracing::debug!(path = %input.path, "reachability probe disabled, rule skipped");
                    report.skip(input.path, rule.name(), "probe disabled");
                    return;
                };
                check_reachable(input, probe)
            },
        };
        if !passed {
            tracing::debug!(path = %input.path, rule = rule.name(), "rule failed");
        }
        report.record(input.path, rule.name(), passed);
    }
}
