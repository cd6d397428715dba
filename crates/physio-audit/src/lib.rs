//! Audit log of submitted prompts.
//!
//! Every submission is persisted as one pretty-printed JSON file named after
//! the local time it was written, e.g. `prompt-logs/20240101_000000.json`.

mod entry;
mod error;
mod writer;

pub use entry::PromptLogEntry;
pub use error::AuditError;
pub use writer::{AuditLogWriter, DEFAULT_LOG_DIR};
