use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a database query. Surfaced unmodified to the caller.
#[derive(Debug, Error)]
pub enum NotionError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Notion API returned {status} ({code}): {message}")]
    Api {
        status: StatusCode,
        code: String,
        message: String,
    },

    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
}
