//! Local directory content source.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::instrument;

use quizdeck_core::traits::ResourceFetcher;
use quizdeck_core::FetchError;

/// Reads content resources from a directory on disk.
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Names of the subdirectories of the data root, sorted.
    pub async fn list_folders(&self) -> std::io::Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut folders = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                folders.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        folders.sort();
        Ok(folders)
    }
}

#[async_trait]
impl ResourceFetcher for DirFetcher {
    fn name(&self) -> &str {
        "dir"
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let full = self.root.join(path);
        tokio::fs::read_to_string(&full).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => FetchError::NotFound(full.display().to_string()),
            _ => FetchError::Io {
                path: full.display().to_string(),
                source: e,
            },
        })
    }
}
