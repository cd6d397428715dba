//! File-per-submission audit writer.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{debug, warn};

use crate::entry::PromptLogEntry;
use crate::error::AuditError;

pub const DEFAULT_LOG_DIR: &str = "prompt-logs";

const FILE_NAME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Writes each prompt to `<log_dir>/<YYYYMMDD_HHMMSS>.json`.
///
/// File names have second granularity, so two prompts written within the
/// same second share a file and the later one wins.
#[derive(Debug, Clone)]
pub struct AuditLogWriter {
    log_dir: PathBuf,
}

impl Default for AuditLogWriter {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_DIR)
    }
}

impl AuditLogWriter {
    pub fn new<P: AsRef<Path>>(log_dir: P) -> Self {
        Self {
            log_dir: log_dir.as_ref().to_path_buf(),
        }
    }

    /// Persist `prompt` stamped with the current local time.
    pub fn write(&self, prompt: &str) -> Result<PathBuf, AuditError> {
        self.write_at(prompt, Local::now().naive_local())
    }

    /// Persist `prompt` stamped with `at`. Returns the written path.
    pub fn write_at(&self, prompt: &str, at: NaiveDateTime) -> Result<PathBuf, AuditError> {
        fs::create_dir_all(&self.log_dir).map_err(|source| AuditError::Io {
            path: self.log_dir.clone(),
            source,
        })?;

        let path = self.record_path(at);
        if path.exists() {
            warn!(
                "Audit record {} already exists and will be overwritten",
                path.display()
            );
        }

        let entry = PromptLogEntry::new(prompt, at);
        let content = to_pretty_json(&entry)?;

        fs::write(&path, content).map_err(|source| AuditError::Io {
            path: path.clone(),
            source,
        })?;

        debug!("Audit record saved: {}", path.display());
        Ok(path)
    }

    fn record_path(&self, at: NaiveDateTime) -> PathBuf {
        self.log_dir
            .join(format!("{}.json", at.format(FILE_NAME_FORMAT)))
    }
}

/// Four-space indented JSON. Non-ASCII text is written as-is.
fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, AuditError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}
