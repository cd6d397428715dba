//! Declarative prompt builder for physiotherapy intake assessments.
//!
//! Turns an [`IntakeRecord`](physio_core::IntakeRecord) into the request text
//! sent to the generation service.
//!
//! # Example
//!
//! ```rust
//! use physio_core::{IntakeRecord, Language};
//! use physio_prompt::{AssessmentPrompt, Prompt, SanitizePolicy};
//!
//! let intake = IntakeRecord {
//!     age: Some(34),
//!     pain_location: "right knee".to_string(),
//!     ..Default::default()
//! };
//!
//! let prompt = AssessmentPrompt {
//!     intake,
//!     language: Language::English,
//!     sanitize: SanitizePolicy::Identity,
//!     placeholder: None,
//! };
//!
//! let rendered = prompt.render();
//! assert!(rendered.contains("right knee"));
//! ```

mod assessment;
mod builder;
mod templates;
mod traits;
mod types;

pub use assessment::AssessmentPrompt;
pub use builder::PromptBuilder;
pub use templates::field_label;
pub use traits::*;
pub use types::*;
