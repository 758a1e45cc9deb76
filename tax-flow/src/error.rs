use thiserror::Error;

/// Rejection raised locally before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields.")]
    MissingRequiredFields { fields: Vec<&'static str> },
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl FlowError {
    /// True for failures that came back from (or never reached) the remote service.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            FlowError::Http { .. } | FlowError::Transport(_) | FlowError::Decode(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FlowError>;
