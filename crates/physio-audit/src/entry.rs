use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp layout with microsecond precision and no offset.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// One persisted prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptLogEntry {
    pub content: String,
    pub timestamp: String,
}

impl PromptLogEntry {
    pub fn new(content: impl Into<String>, at: NaiveDateTime) -> Self {
        Self {
            content: content.into(),
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}
