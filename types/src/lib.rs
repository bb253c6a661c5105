//! Core domain types for protolens.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! The lint core produces [`DiagnosticRecord`]s; editor bindings consume them.

mod diagnostic;
mod language;

pub use diagnostic::{
    ColumnRange, DiagnosticRecord, DiagnosticSeverity, InvalidRangeError, UnknownSeverityError,
};
pub use language::DocumentLanguage;
