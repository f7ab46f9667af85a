//! Content loader.
//!
//! Fetches the folder index, then every folder document concurrently, and
//! joins them with an all-succeed-or-fail barrier.

use std::sync::Arc;

use futures::future::try_join_all;
use tracing::instrument;

use crate::error::LoadError;
use crate::model::{FolderIndex, LoadedFolder, SourceDocument};
use crate::traits::{folder_document_path, ResourceFetcher, INDEX_PATH};

/// Loads quiz content through a [`ResourceFetcher`].
pub struct ContentLoader {
    fetcher: Arc<dyn ResourceFetcher>,
}

impl ContentLoader {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self { fetcher }
    }

    /// Load every source document, in index order.
    pub async fn load(&self) -> Result<Vec<SourceDocument>, LoadError> {
        Ok(self
            .load_folders()
            .await?
            .into_iter()
            .map(|f| f.document)
            .collect())
    }

    /// Load every source document together with its folder identifier.
    ///
    /// Any failing folder fails the whole load.
    #[instrument(skip(self), fields(fetcher = %self.fetcher.name()))]
    pub async fn load_folders(&self) -> Result<Vec<LoadedFolder>, LoadError> {
        let index = self.load_index().await?;
        tracing::debug!(folders = index.folders.len(), "fetched index");

        let folders = try_join_all(index.folders.iter().map(|id| self.load_folder(id))).await?;

        tracing::info!(
            folders = folders.len(),
            questions = folders.iter().map(LoadedFolder::question_count).sum::<usize>(),
            "content loaded"
        );
        Ok(folders)
    }

    /// Fetch and parse the index resource.
    pub async fn load_index(&self) -> Result<FolderIndex, LoadError> {
        let body = self
            .fetcher
            .fetch(INDEX_PATH)
            .await
            .map_err(|e| LoadError::IndexUnreachable(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| LoadError::IndexMalformed(e.to_string()))
    }

    async fn load_folder(&self, id: &str) -> Result<LoadedFolder, LoadError> {
        let path = folder_document_path(id);
        let failed = |reason: String| LoadError::FolderFetchFailed {
            folder: id.to_string(),
            reason,
        };

        let body = self
            .fetcher
            .fetch(&path)
            .await
            .map_err(|e| failed(e.to_string()))?;
        let document: SourceDocument = serde_json::from_str(&body)
            .map_err(|e| failed(format!("invalid document {path}: {e}")))?;

        Ok(LoadedFolder {
            id: id.to_string(),
            document,
        })
    }
}
