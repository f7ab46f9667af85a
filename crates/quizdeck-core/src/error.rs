//! Content loading error types.
//!
//! Fetchers report [`FetchError`] for a single resource; the loader maps those
//! into [`LoadError`] according to which resource failed.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when fetching a single resource.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The resource does not exist.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The server returned a non-success status.
    #[error("HTTP {status} fetching {path}")]
    Http { status: u16, path: String },

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The request timed out.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Reading a local file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that terminate a content load attempt. There is no partial result.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The index resource could not be fetched.
    #[error("index unreachable: {0}")]
    IndexUnreachable(String),

    /// The index resource was fetched but is not a valid folder list.
    #[error("index malformed: {0}")]
    IndexMalformed(String),

    /// A folder document could not be fetched or parsed.
    #[error("failed to load folder '{folder}': {reason}")]
    FolderFetchFailed { folder: String, reason: String },
}

impl LoadError {
    /// The folder that caused the failure, if any.
    pub fn folder(&self) -> Option<&str> {
        match self {
            LoadError::FolderFetchFailed { folder, .. } => Some(folder),
            _ => None,
        }
    }
}
