//! Core trait definitions for content sources.
//!
//! The async [`ResourceFetcher`] trait is implemented by the
//! `quizdeck-sources` crate (HTTP, local directory, and an in-memory mock).

use async_trait::async_trait;

use crate::error::FetchError;

/// Path of the index resource, relative to the data root.
pub const INDEX_PATH: &str = "index.json";

/// File name of each folder's document.
pub const FOLDER_DOCUMENT: &str = "info.json";

/// Path of a folder's document, relative to the data root.
pub fn folder_document_path(folder: &str) -> String {
    format!("{folder}/{FOLDER_DOCUMENT}")
}

/// Trait for backends that fetch raw resources relative to a data root.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Human-readable fetcher name (e.g. "http").
    fn name(&self) -> &str;

    /// Fetch the resource at `path` (relative to the data root) as text.
    async fn fetch(&self, path: &str) -> Result<String, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_path() {
        assert_eq!(folder_document_path("1234567-2024"), "1234567-2024/info.json");
    }
}
