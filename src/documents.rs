//! Resume / cover-letter attachments.
//!
//! Documents travel inside JSON bodies as standard-alphabet base64. A
//! candidate may instead ask for the document stored on their profile, in
//! which case nothing is sent and the backend falls back on its own copy.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use crate::error::ErrorCode;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DocumentChoice {
    /// Use the document stored on the candidate's profile.
    #[default]
    Default,
    /// Read and attach a local file.
    Upload(PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is empty", .0.display())]
    Empty(PathBuf),

    #[error("document is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
}

impl ErrorCode for DocumentError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "E_DOCUMENT_READ",
            Self::Empty(_) => "E_DOCUMENT_EMPTY",
            Self::Decode(_) => "E_DOCUMENT_DECODE",
        }
    }
}

#[must_use]
pub fn encode_bytes(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// # Errors
///
/// Returns [`DocumentError::Decode`] when `encoded` is not base64.
pub fn decode(encoded: &str) -> Result<Vec<u8>, DocumentError> {
    Ok(STANDARD.decode(encoded.trim())?)
}

/// Read `path` and return its base64 encoding.
///
/// # Errors
///
/// Fails when the file cannot be read or is empty.
pub async fn encode_file(path: &Path) -> Result<String, DocumentError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| DocumentError::Read { path: path.to_path_buf(), source })?;
    if bytes.is_empty() {
        return Err(DocumentError::Empty(path.to_path_buf()));
    }
    debug!(path = %path.display(), bytes = bytes.len(), "documents: encoded upload");
    Ok(encode_bytes(&bytes))
}

impl DocumentChoice {
    /// The base64 payload to send, or `None` for the profile default.
    ///
    /// # Errors
    ///
    /// See [`encode_file`].
    pub async fn resolve(&self) -> Result<Option<String>, DocumentError> {
        match self {
            Self::Default => Ok(None),
            Self::Upload(path) => encode_file(path).await.map(Some),
        }
    }
}

#[cfg(test)]
#[path = "documents_test.rs"]
mod documents_test;
