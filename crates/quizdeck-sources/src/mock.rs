//! Mock content source for testing.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use quizdeck_core::traits::{folder_document_path, ResourceFetcher, INDEX_PATH};
use quizdeck_core::FetchError;

/// An in-memory fetcher for exercising the loader without real I/O.
///
/// Serves configured bodies by path, fails configured paths with a network
/// error, and answers everything else with `NotFound`.
#[derive(Default)]
pub struct MockFetcher {
    /// Map of path → response body.
    resources: HashMap<String, String>,
    /// Paths that fail with a network error.
    failures: HashSet<String>,
    /// Number of fetches made.
    call_count: AtomicU32,
    /// Every path requested, in request order.
    requested: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `path`.
    pub fn with_resource(mut self, path: &str, body: impl Into<String>) -> Self {
        self.resources.insert(path.to_string(), body.into());
        self
    }

    /// Serve an index listing `folders`.
    pub fn with_index(self, folders: &[&str]) -> Self {
        let index = serde_json::json!({ "folders": folders });
        self.with_resource(INDEX_PATH, index.to_string())
    }

    /// Serve `body` as the document of `folder`.
    pub fn with_folder(self, folder: &str, body: impl Into<String>) -> Self {
        self.with_resource(&folder_document_path(folder), body)
    }

    /// Fail every fetch of `path` with a network error.
    pub fn with_failure(mut self, path: &str) -> Self {
        self.failures.insert(path.to_string());
        self
    }

    /// Get the number of fetches made.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get every path requested so far.
    pub fn requested(&self) -> Vec<String> {
        self.requested
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl ResourceFetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.requested
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(path.to_string());

        if self.failures.contains(path) {
            return Err(FetchError::Network(format!("simulated failure for {path}")));
        }
        self.resources
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use quizdeck_core::{ContentLoader, LoadError};

    use super::*;

    fn doc(username: &str) -> String {
        serde_json::json!({
            "user": {"username": username, "profileImage": "p", "socialLink": "s"},
            "topics": []
        })
        .to_string()
    }

    #[tokio::test]
    async fn serves_configured_resources() {
        let fetcher = MockFetcher::new().with_resource("a.json", "{}");
        assert_eq!(fetcher.fetch("a.json").await.unwrap(), "{}");
        assert!(matches!(fetcher.fetch("b.json").await, Err(FetchError::NotFound(_))));
        assert_eq!(fetcher.call_count(), 2);
        assert_eq!(fetcher.requested(), vec!["a.json", "b.json"]);
    }

    #[tokio::test]
    async fn failing_folder_yields_no_partial_result() {
        let fetcher = Arc::new(
            MockFetcher::new()
                .with_index(&["A", "B"])
                .with_folder("A", doc("alice"))
                .with_folder("B", doc("bob"))
                .with_failure("B/info.json"),
        );
        let loader = ContentLoader::new(fetcher.clone());

        let err = loader.load().await.unwrap_err();
        match err {
            LoadError::FolderFetchFailed { folder, reason } => {
                assert_eq!(folder, "B");
                assert!(reason.contains("simulated failure"));
            }
            other => panic!("unexpected error: {other}"),
        }
        // Both folder fetches were issued even though one failed.
        let requested = fetcher.requested();
        assert!(requested.contains(&"A/info.json".to_string()));
        assert!(requested.contains(&"B/info.json".to_string()));
    }

    #[tokio::test]
    async fn index_escapes_folder_ids() {
        let fetcher = Arc::new(
            MockFetcher::new()
                .with_index(&[r#"odd"name"#, r"back\slash"])
                .with_folder(r#"odd"name"#, doc("quote"))
                .with_folder(r"back\slash", doc("backslash")),
        );
        let folders = ContentLoader::new(fetcher).load_folders().await.unwrap();
        let ids: Vec<&str> = folders.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec![r#"odd"name"#, r"back\slash"]);
        assert_eq!(folders[1].document.user.username, "backslash");
    }

    #[tokio::test]
    async fn failing_index_is_unreachable() {
        let fetcher = Arc::new(MockFetcher::new().with_failure(INDEX_PATH));
        let err = ContentLoader::new(fetcher.clone()).load().await.unwrap_err();
        assert!(matches!(err, LoadError::IndexUnreachable(_)));
        assert_eq!(fetcher.call_count(), 1);
    }
}
