use thiserror::Error;

#[derive(Error, Debug)]
pub enum TldwError {
    #[error("Backend rejected the request ({code}): {detail}")]
    Backend { code: String, detail: String },

    #[error("State store failed for key {key}: {reason}")]
    Store { key: String, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, TldwError>;
