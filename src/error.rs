//! Error taxonomy shared by the session, storage and HTTP layers.
//!
//! ERROR HANDLING
//! ==============
//! The backend only ever hands back human-readable text, so every variant
//! carries a message; callers branch on the variant (or `error_code()`)
//! instead of parsing that text.

/// Message attached to every forced logout caused by a 401.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please login again.";

/// Stable machine-readable codes for error enums.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// Errors produced by a single backend call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No response reached the client.
    #[error("network error: {0}")]
    Transport(String),

    /// The backend rejected the bearer token; the session has been cleared.
    #[error("Session expired. Please login again.")]
    Unauthorized,

    /// Any other non-2xx response, with the server's message when it sent one.
    #[error("{message}")]
    Domain { status: u16, message: String },

    /// A 2xx body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The caller's scope was cancelled before the response arrived.
    #[error("request cancelled")]
    Cancelled,

    /// The request could not be built (bad URL, unreadable upload, ...).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// HTTP status behind the error, when one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Domain { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl ErrorCode for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "E_TRANSPORT",
            Self::Unauthorized => "E_UNAUTHORIZED",
            Self::Domain { .. } => "E_DOMAIN",
            Self::Decode(_) => "E_DECODE",
            Self::Cancelled => "E_CANCELLED",
            Self::InvalidRequest(_) => "E_INVALID_REQUEST",
        }
    }
}

/// Errors from the persisted client-side storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted value exists but cannot be parsed.
    #[error("persisted value for `{key}` is corrupt: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("storage serialize failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "E_STORAGE_IO",
            Self::Corrupt { .. } => "E_PERSISTENCE_CORRUPT",
            Self::Serialize(_) => "E_STORAGE_SERIALIZE",
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;
