pub mod cli;
pub mod config;
pub mod streamer;

pub use physio_core::{IntakeRecord, Language};
pub use streamer::{AssessmentError, AssessmentStream, AssessmentStreamer, generate_assessment};
