//! Error handling for catalog requests
//!
//! Every failure surfaces as a single `CatalogError`. Callers show
//! `message()` to the user; `kind()` tells apart a server-provided message,
//! a generic status fallback and a transport failure.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// No response was obtained.
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{detail}")]
    Api { status: StatusCode, detail: String },
    #[error("Request failed with status {}", .0.as_u16())]
    Status(StatusCode),
    #[error("malformed response ({status}): {source}")]
    MalformedResponse {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },
    #[error("page must be a positive integer, got {0}")]
    InvalidPage(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Message,
    Generic,
    Transport,
    Malformed,
    Invalid,
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Transport(_) => ErrorKind::Transport,
            CatalogError::Api { .. } => ErrorKind::Message,
            CatalogError::Status(_) => ErrorKind::Generic,
            CatalogError::MalformedResponse { .. } => ErrorKind::Malformed,
            CatalogError::InvalidPage(_) => ErrorKind::Invalid,
        }
    }

    /// Text suitable for the user.
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            CatalogError::Transport(e) => e.status(),
            CatalogError::Api { status, .. }
            | CatalogError::Status(status)
            | CatalogError::MalformedResponse { status, .. } => Some(*status),
            CatalogError::InvalidPage(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Interpret a non-success response body.
pub(crate) fn from_error_body(status: StatusCode, body: &[u8]) -> CatalogError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody { detail }) if !detail.trim().is_empty() => CatalogError::Api { status, detail },
        _ => CatalogError::Status(status),
    }
}
