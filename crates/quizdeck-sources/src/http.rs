//! HTTP content source.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::instrument;

use quizdeck_core::traits::ResourceFetcher;
use quizdeck_core::FetchError;

/// Fetches content resources over HTTP(S) relative to a base URL.
pub struct HttpFetcher {
    base_url: String,
    timeout: Option<Duration>,
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher rooted at `base_url`.
    ///
    /// Without a timeout, a request that never completes hangs forever.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let response = self.client.get(self.url(path)).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout.unwrap_or_default())
            } else if e.is_connect() {
                FetchError::Network(format!("{} not reachable: {e}", self.base_url))
            } else {
                FetchError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(FetchError::NotFound(path.to_string()));
        }
        if status >= 400 {
            return Err(FetchError::Http {
                status,
                path: path.to_string(),
            });
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout.unwrap_or_default())
            } else {
                FetchError::Network(format!("failed to read body of {path}: {e}"))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use quizdeck_core::{ContentLoader, LoadError};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn document(username: &str) -> serde_json::Value {
        serde_json::json!({
            "user": {
                "username": username,
                "profileImage": format!("https://img.example/{username}.png"),
                "socialLink": format!("https://social.example/{username}")
            },
            "topics": [{
                "topic": "General",
                "questions": [{
                    "question": format!("{username}'s question"),
                    "options": ["a", "b", "c", "d"],
                    "answer": "b"
                }]
            }]
        })
    }

    async fn mount(server: &MockServer, route: &str, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(template)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn fetches_relative_to_base_url() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/data/index.json",
            ResponseTemplate::new(200).set_body_string(r#"{"folders": []}"#),
        )
        .await;

        let fetcher = HttpFetcher::new(&format!("{}/data/", server.uri()), None).unwrap();
        let body = fetcher.fetch("index.json").await.unwrap();
        assert_eq!(body, r#"{"folders": []}"#);
    }

    #[tokio::test]
    async fn not_found_and_server_errors() {
        let server = MockServer::start().await;
        mount(&server, "/broken.json", ResponseTemplate::new(500)).await;

        let fetcher = HttpFetcher::new(&server.uri(), None).unwrap();
        let err = fetcher.fetch("missing.json").await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound(_)));

        let err = fetcher.fetch("broken.json").await.unwrap_err();
        assert!(matches!(err, FetchError::Http { status: 500, .. }));
    }

    #[tokio::test]
    async fn loads_every_folder() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/index.json",
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"folders": ["A", "B"]})),
        )
        .await;
        mount(
            &server,
            "/A/info.json",
            ResponseTemplate::new(200).set_body_json(document("alice")),
        )
        .await;
        mount(
            &server,
            "/B/info.json",
            ResponseTemplate::new(200).set_body_json(document("bob")),
        )
        .await;

        let loader = ContentLoader::new(Arc::new(HttpFetcher::new(&server.uri(), None).unwrap()));
        let docs = loader.load().await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].user.username, "alice");
        assert_eq!(docs[1].user.username, "bob");
    }

    #[tokio::test]
    async fn missing_folder_fails_the_load() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/index.json",
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"folders": ["A", "B"]})),
        )
        .await;
        mount(
            &server,
            "/A/info.json",
            ResponseTemplate::new(200).set_body_json(document("alice")),
        )
        .await;

        let loader = ContentLoader::new(Arc::new(HttpFetcher::new(&server.uri(), None).unwrap()));
        let err = loader.load().await.unwrap_err();
        assert!(matches!(err, LoadError::FolderFetchFailed { ref folder, .. } if folder == "B"));
    }

    #[tokio::test]
    async fn unreachable_server_fails_index() {
        // Nothing listens on port 9 on test machines.
        let fetcher = HttpFetcher::new("http://127.0.0.1:9", None).unwrap();
        let loader = ContentLoader::new(Arc::new(fetcher));
        let err = loader.load().await.unwrap_err();
        assert!(matches!(err, LoadError::IndexUnreachable(_)));
    }

    #[tokio::test]
    async fn configured_timeout_applies() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/index.json",
            ResponseTemplate::new(200)
                .set_body_string(r#"{"folders": []}"#)
                .set_delay(Duration::from_secs(5)),
        )
        .await;

        let fetcher = HttpFetcher::new(&server.uri(), Some(Duration::from_millis(200))).unwrap();
        let err = fetcher.fetch("index.json").await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout(_)));
    }

    #[tokio::test]
    async fn slow_fetch_hangs_without_timeout() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/index.json",
            ResponseTemplate::new(200)
                .set_body_string(r#"{"folders": []}"#)
                .set_delay(Duration::from_secs(5)),
        )
        .await;

        let loader = ContentLoader::new(Arc::new(HttpFetcher::new(&server.uri(), None).unwrap()));
        let outcome = tokio::time::timeout(Duration::from_millis(300), loader.load()).await;
        assert!(outcome.is_err());
    }
}
