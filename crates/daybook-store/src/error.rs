use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by store operations.
///
/// `InvalidInput` and `NotFound` describe caller mistakes and map to client
/// errors at the HTTP layer; the remaining variants are internal failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} holds data of an unexpected shape: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize store data: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}
