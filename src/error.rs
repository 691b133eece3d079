use thiserror::Error;

#[derive(Error, Debug)]
pub enum KrantError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid proxy envelope: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid delimiter pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("HTTP status error: {status}")]
    HttpStatus { status: u16 },

    #[error("{strategy} returned an empty document")]
    EmptyBody { strategy: String },

    #[error("Failed to load document '{source_id}': {}", .attempts.join("; "))]
    LoadFailure {
        source_id: String,
        attempts: Vec<String>,
    },

    #[error("Configuration error: {reason}")]
    InvalidConfig { reason: String },

    #[error("Section {index} is not on the current page")]
    SectionNotFound { index: usize },

    #[error("Output directory error: {reason}")]
    OutputDirectory { reason: String },

    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, KrantError>;
