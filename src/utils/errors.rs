use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Enrichment API error: {0}")]
    ApiError(String),

    #[error("Invalid enrichment response: {0}")]
    InvalidResponse(String),

    #[error("Missing API key (set GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
