//! Error types for the todo API client.
//!
//! # Design
//! Three failure kinds reach callers through one type: no response at all
//! (`Transport`), a non-2xx response (`Http`), and a body that is not the
//! JSON we expected (`Decode`). Callers usually only need the message, which
//! is what `Display` produces; for `Http` that is the server's own `error`
//! text when it sent one.

use thiserror::Error;

/// Errors returned by the client, the services and the transport.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No HTTP response was obtained (DNS, refused connection, timeout).
    #[error("network error: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status of an `Http` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}
