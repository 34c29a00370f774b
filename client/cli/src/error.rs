//! Error handling for backend calls
//!
//! Every failure collapses to a human-readable string in the end; the variants
//! only exist so callers can tell a backend-reported error from a broken
//! connection.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the backend's `error` field verbatim.
    #[error("{message}")]
    Backend { status: StatusCode, message: String },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Rejected locally before any request was issued.
    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    /// Build a backend error from a non-2xx status and its raw body.
    ///
    /// Bodies of the form `{"error": "..."}` surface the message as-is;
    /// anything else falls back to `<status>: <body>`.
    pub fn from_response_body(status: StatusCode, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed.error,
            Err(_) if body.trim().is_empty() => status.to_string(),
            Err(_) => format!("{}: {}", status, body.trim()),
        };
        ApiError::Backend { status, message }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Backend { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }
}
