use thiserror::Error;

/// Errors raised while talking to the completion service.
#[derive(Error, Debug)]
pub enum GroqError {
    #[error("Failed to make HTTP request: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse stream chunk: {0}")]
    ParseError(String),

    #[error("API key not provided. Set the {env_var} environment variable or pass it via config")]
    MissingApiKey { env_var: String },
}
