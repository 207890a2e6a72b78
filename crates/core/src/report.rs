//! Validation outcomes.

use crate::path::FieldPath;
use serde::Serialize;

/// Result of one rule on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleOutcome {
    /// Field location.
    pub path: FieldPath,
    /// Rule name (`duration`, `found_in`, `reachable`).
    pub rule: &'static str,
    /// Whether the value satisfied the rule.
    pub passed: bool,
}

/// A rule that was not evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRule {
    /// Field location.
    pub path: FieldPath,
    /// Rule name.
    pub rule: &'static str,
    /// Why it was skipped.
    pub reason: &'static str,
}

/// Ordered outcomes of a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    outcomes: Vec<RuleOutcome>,
    skipped: Vec<SkippedRule>,
}

impl ValidationReport {
    pub(crate) fn record(&mut self, path: &FieldPath, rule: &'static str, passed: bool) {
        self.outcomes.push(RuleOutcome {
            path: path.clone(),
            rule,
            passed,
        });
    }

    pub(crate) fn skip(&mut self, path: &FieldPath, rule: &'static str, reason: &'static str) {
        self.skipped.push(SkippedRule {
            path: path.clone(),
            rule,
            reason,
        });
    }

    /// Every evaluated rule, in walk order.
    #[must_use]
    pub fn outcomes(&self) -> &[RuleOutcome] {
        &self.outcomes
    }

    /// Rules that were not evaluated.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedRule] {
        &self.skipped
    }

    /// Evaluated rules that did not pass.
    pub fn failures(&self) -> impl Iterator<Item = &RuleOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.passed)
    }

    /// True when no evaluated rule failed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.passed)
    }

    /// Number of evaluated rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// True when nothing was evaluated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Outcome for `rule` at the field rendered as `path`.
    #[must_use]
    pub fn outcome(&self, path: &str, rule: &str) -> Option<&RuleOutcome> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.rule == rule && outcome.path.to_string() == path)
    }
}
