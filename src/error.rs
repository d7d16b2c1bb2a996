use thiserror::Error;

#[derive(Error, Debug)]
pub enum MinerError {
    #[error("Tagger unavailable for language '{language}': {message}")]
    TaggerUnavailable { language: String, message: String },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported manuscript format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, MinerError>;
