//! Error types for reading retrieval.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Endpoint returned HTTP {0}")]
    Status(u16),

    #[error("Malformed response body: {0}")]
    Decode(String),
}

impl FetchError {
    /// Short tag used in structured log fields
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::Status(_) => "status",
            FetchError::Decode(_) => "decode",
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}
