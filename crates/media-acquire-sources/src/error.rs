use thiserror::Error;

/// Failure talking to an external collaborator
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{0} is not configured")]
    NotConfigured(String),

    #[error("{service} rejected the API key (401 Unauthorized)")]
    Unauthorized { service: String },

    #[error("{service} returned {status}: {body}")]
    Status {
        service: String,
        status: u16,
        body: String,
    },

    #[error("{service} rejected the request: {message}")]
    Rejected { service: String, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Credentials or settings are missing; retrying before the user acts is pointless
    pub fn is_missing_prerequisite(&self) -> bool {
        matches!(
            self,
            SourceError::NotConfigured(_)
                | SourceError::Unauthorized { .. }
                | SourceError::Config(_)
        )
    }
}
