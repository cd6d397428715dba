use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("failed to read intake file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid intake TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid intake JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} out of range: {value} (valid range: {valid_range})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        valid_range: &'static str,
    },
}
