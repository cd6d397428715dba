//! Core types for physio-assess.
//!
//! This crate provides the types shared by every other component:
//! - The patient intake record and its 17 named fields
//! - Allowed choices for the single- and multi-choice fields
//! - Output language selection

mod choices;
mod error;
mod field;
mod intake;
mod language;

pub use choices::{Choice, choices_for, is_listed_choice};
pub use error::IntakeError;
pub use field::{FieldKind, FieldValue, IntakeField};
pub use intake::IntakeRecord;
pub use language::Language;
