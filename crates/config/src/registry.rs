//! Name-indexed registry of the built-in field groups.

use crate::{ActionLogArchivingFieldGroup, ElasticSearchFieldGroup, SecurityScannerFieldGroup};
use fieldgroup_core::{
    Document, FieldError, Record, RecordSchema, ValidationReport, Validator, materialize,
    to_document,
};
use fieldgroup_shared::{ErrorCode, ErrorEnvelope};
use serde::Serialize;
use std::fmt;

/// Outcome of materializing and validating one field group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupReport {
    /// Group name.
    pub group: &'static str,
    /// Structural errors from materialization.
    pub errors: Vec<FieldError>,
    /// Rule outcomes.
    pub validation: ValidationReport,
    /// The materialized record written back as a document, defaults included.
    pub effective: Document,
}

impl GroupReport {
    /// True when there are no field errors and no failed rules.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.validation.is_valid()
    }
}

type CheckFn = fn(&'static str, &Document, &Validator<'_>) -> GroupReport;

/// A registered field group: a name bound to a record type.
#[derive(Clone, Copy)]
pub struct FieldGroup {
    name: &'static str,
    schema: fn() -> &'static RecordSchema,
    check: CheckFn,
}

impl FieldGroup {
    /// Bind `name` to record type `R`.
    #[must_use]
    pub fn of<R: Record>(name: &'static str) -> Self {
        Self {
            name,
            schema: R::record_schema,
            check: check_group::<R>,
        }
    }

    /// Group name as used on the command line.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Top-level record schema.
    #[must_use]
    pub fn schema(&self) -> &'static RecordSchema {
        (self.schema)()
    }

    /// Materialize this group from `document` and validate the result.
    #[must_use]
    pub fn check(&self, document: &Document, validator: &Validator<'_>) -> GroupReport {
        (self.check)(self.name, document, validator)
    }
}

impl fmt::Debug for FieldGroup {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FieldGroup")
            .field("name", &self.name)
            .field("record", &self.schema().name)
            .finish()
    }
}

fn check_group<R: Record>(
    group: &'static str,
    document: &Document,
    validator: &Validator<'_>,
) -> GroupReport {
    let (record, errors) = materialize::<R>(document).into_parts();
    let validation = validator.validate(&record);
    let effective = to_document(&record);
    tracing::debug!(
        group,
        errors = errors.len(),
        failed_rules = validation.failures().count(),
        "checked field group"
    );
    GroupReport {
        group,
        errors,
        validation,
        effective,
    }
}

/// Ordered set of field groups.
#[derive(Debug, Clone)]
pub struct FieldGroupRegistry {
    groups: Vec<FieldGroup>,
}

impl FieldGroupRegistry {
    /// Registry of every group shipped with this crate, sorted by name.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_groups(vec![
            FieldGroup::of::<ActionLogArchivingFieldGroup>("action_log_archiving"),
            FieldGroup::of::<ElasticSearchFieldGroup>("elasticsearch"),
            FieldGroup::of::<SecurityScannerFieldGroup>("security_scanner"),
        ])
    }

    /// Registry over `groups`; later duplicates of a name are dropped.
    #[must_use]
    pub fn from_groups(groups: Vec<FieldGroup>) -> Self {
        let mut unique: Vec<FieldGroup> = Vec::with_capacity(groups.len());
        for group in groups {
            if unique.iter().all(|existing| existing.name != group.name) {
                unique.push(group);
            }
        }
        unique.sort_by_key(|group| group.name);
        Self { groups: unique }
    }

    /// Group names in order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.groups.iter().map(|group| group.name)
    }

    /// Registered groups in order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldGroup> {
        self.groups.iter()
    }

    /// Look up a group by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldGroup> {
        self.groups.iter().find(|group| group.name == name)
    }

    /// Resolve `names` to groups, in registry order with repeats collapsed.
    ///
    /// An empty selection means every group. The first unknown name fails
    /// the whole selection.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&FieldGroup>, ErrorEnvelope> {
        if let Some(unknown) = names
            .iter()
            .map(AsRef::<str>::as_ref)
            .find(|name| self.get(name).is_none())
        {
            return Err(self.unknown_group(unknown));
        }
        Ok(self
            .groups
            .iter()
            .filter(|group| names.is_empty() || names.iter().any(|name| name.as_ref() == group.name))
            .collect())
    }

    /// Check one group by name.
    pub fn check(
        &self,
        name: &str,
        document: &Document,
        validator: &Validator<'_>,
    ) -> Result<GroupReport, ErrorEnvelope> {
        self.get(name)
            .map(|group| group.check(document, validator))
            .ok_or_else(|| self.unknown_group(name))
    }

    /// Check every group against the same document.
    #[must_use]
    pub fn check_all(&self, document: &Document, validator: &Validator<'_>) -> Vec<GroupReport> {
        self.groups
            .iter()
            .map(|group| group.check(document, validator))
            .collect()
    }

    fn unknown_group(&self, name: &str) -> ErrorEnvelope {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "unknown_field_group"),
            format!("unknown field group `{name}`"),
        )
        .with_metadata("group", name.to_owned())
        .with_metadata("known", self.names().collect::<Vec<_>>().join(","))
    }
}

impl Default for FieldGroupRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
