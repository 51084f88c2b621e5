//! Error types for Maxchat.

use thiserror::Error;

/// Library-level error type for Maxchat operations.
#[derive(Error, Debug)]
pub enum MaxchatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing API key for {provider}: set {env_var} or pass --api-key")]
    MissingApiKey { provider: String, env_var: String },

    #[error(transparent)]
    Transcript(#[from] crate::youtube::TranscriptError),

    #[error("Failed to load site {url}: {reason}")]
    SiteLoad { url: String, reason: String },

    #[error("Failed to parse {path}: {reason}")]
    FileParse { path: String, reason: String },

    #[error("Document is empty: {0}")]
    EmptyDocument(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("LLM API error: {0}")]
    Llm(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Maxchat operations.
pub type Result<T> = std::result::Result<T, MaxchatError>;
