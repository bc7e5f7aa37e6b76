use thiserror::Error;

#[derive(Error, Debug)]
pub enum AskError {
    /// The incremental delivery channel failed (connect, status, read, or early EOF).
    #[error("Transport error: {0}")]
    Transport(String),

    /// An inbound stream message did not match a recognized shape. Never escalated.
    #[error("Malformed stream message: {0}")]
    Parse(String),

    #[error("Fallback request failed: {0}")]
    Fallback(String),

    #[error("Invalid question: {0}")]
    Validation(String),

    #[error("Query session has shut down")]
    SessionClosed,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AskError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn fallback(message: impl Into<String>) -> Self {
        Self::Fallback(message.into())
    }
}

pub type Result<T> = std::result::Result<T, AskError>;
