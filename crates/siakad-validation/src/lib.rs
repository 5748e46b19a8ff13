//! Declarative request-shape validation.
//!
//! A [`Schema`] describes an expected JSON object: each field carries a kind,
//! an optionality marker, an optional default, and an ordered list of rules
//! with client-facing messages. Validating returns the coerced object or the
//! ordered list of `(path, message)` issues; [`Schema::describe`] answers
//! introspection queries ("which fields are expected, which are required")
//! that [`FieldReport::analyze`] uses to diff a raw input's shape against the
//! declared one.

pub mod report;
pub mod schema;

pub use report::{FieldReport, Issue, Issues};
pub use schema::{Field, Schema, SchemaShape};
