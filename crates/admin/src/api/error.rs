//! Backend API errors.

use catalog_sync_core::ShapeError;
use thiserror::Error;

/// Errors that can occur when calling a backend service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed.
    #[error("Backend request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("Backend rejected the request ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    /// The response parsed but does not have the expected structure.
    #[error("Unexpected response shape: {0}")]
    Shape(#[from] ShapeError),

    /// The response body is not valid JSON.
    #[error("Backend response error: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message supplied by the backend, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// True when the request never reached a response.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
