use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}")]
    Status { status: u16, body: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),
}

pub type Result<T> = std::result::Result<T, ExtractorError>;
