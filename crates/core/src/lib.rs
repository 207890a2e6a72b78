//! # fieldgroup-core
//!
//! Turns an untyped configuration document into a typed, defaulted record
//! and validates it.
//!
//! The pipeline runs in one direction:
//!
//! 1. [`normalize`] converts an arbitrary-keyed [`RawMap`] into a [`Document`].
//! 2. [`materialize`] builds a record type (anything implementing [`Record`],
//!    usually via `#[derive(Record)]`) and collects every [`FieldError`].
//! 3. [`Validator::validate`] walks the record and evaluates each field's
//!    [`Rule`]s into a [`ValidationReport`].
//!
//! ```
//! use fieldgroup_core::{Document, OpenMap, Record, Validator, Value, materialize};
//!
//! #[derive(Debug, Default, Record)]
//! struct Archiving {
//!     #[field(omit_empty, duration)]
//!     threshold: String,
//!     #[field(omit_empty, found_in = "storage")]
//!     location: String,
//!     storage: OpenMap,
//! }
//!
//! let mut document = Document::new();
//! document.insert("threshold".into(), Value::from("2w"));
//! let result = materialize::<Archiving>(&document);
//! assert!(result.is_clean());
//!
//! let report = Validator::offline().validate(&result.record);
//! assert!(report.is_valid());
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

extern crate self as fieldgroup_core;

mod error;
mod materialize;
mod normalize;
mod path;
mod probe;
mod record;
mod report;
mod rules;
mod schema;
mod validate;
mod value;

pub use error::{FieldError, FieldErrorKind};
pub use fieldgroup_derive::Record;
pub use materialize::{Materialization, defaults, materialize, to_document};
pub use normalize::{NormalizationError, normalize};
pub use path::{FieldPath, Segment};
pub use probe::{HttpProbe, ProbeError};
pub use record::{
    FieldRef, FieldType, OpenMap, Record, RecordView, SequenceView, Slot, coerce_record,
};
pub use report::{RuleOutcome, SkippedRule, ValidationReport};
pub use rules::{PredicateInput, check_duration, check_found_in, check_reachable, is_duration};
pub use schema::{DefaultValue, FieldKind, FieldSchema, RecordSchema, Rule};
pub use validate::Validator;
pub use value::{Document, RawMap, Value, ValueKind};

/// Returns the core crate version.
#[must_use]
pub const fn core_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
