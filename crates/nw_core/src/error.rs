use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0} is not configured")]
    MissingCredentials(String),

    #[error("{0} is required")]
    MissingParameter(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("News source error: {0}")]
    Source(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Summarization error: {0}")]
    Summarization(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
