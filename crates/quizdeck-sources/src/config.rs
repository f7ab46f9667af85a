//! quizdeck configuration and fetcher factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizdeck_core::traits::ResourceFetcher;
use quizdeck_core::SessionConfig;

use crate::dir::DirFetcher;
use crate::http::HttpFetcher;

/// Top-level quizdeck configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizdeckConfig {
    /// Content root: an `http(s)://` base URL or a local directory.
    #[serde(default = "default_data_root")]
    pub data_root: String,
    /// Quiz-wide time limit in seconds.
    #[serde(default = "default_time_limit")]
    pub time_limit_secs: u32,
    /// Delay between answering and the next question, in milliseconds.
    #[serde(default = "default_advance_delay")]
    pub advance_delay_ms: u64,
    /// Countdown tick period in milliseconds.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Per-request timeout for HTTP sources. Unset means no timeout.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_data_root() -> String {
    "./public/data".to_string()
}
fn default_time_limit() -> u32 {
    quizdeck_core::session::DEFAULT_TIME_LIMIT_SECS
}
fn default_advance_delay() -> u64 {
    quizdeck_core::session::DEFAULT_ADVANCE_DELAY.as_millis() as u64
}
fn default_tick_interval() -> u64 {
    quizdeck_core::session::DEFAULT_TICK_INTERVAL.as_millis() as u64
}

impl Default for QuizdeckConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            time_limit_secs: default_time_limit(),
            advance_delay_ms: default_advance_delay(),
            tick_interval_ms: default_tick_interval(),
            request_timeout_secs: None,
        }
    }
}

impl QuizdeckConfig {
    /// Session timing derived from this configuration.
    pub fn session_config(&self) -> Result<SessionConfig> {
        anyhow::ensure!(self.tick_interval_ms > 0, "tick_interval_ms must be at least 1");
        Ok(SessionConfig {
            time_limit_secs: self.time_limit_secs,
            advance_delay: Duration::from_millis(self.advance_delay_ms),
            tick_interval: Duration::from_millis(self.tick_interval_ms),
        })
    }

    /// Whether the data root is served over HTTP.
    pub fn is_remote(&self) -> bool {
        self.data_root.starts_with("http://") || self.data_root.starts_with("https://")
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `quizdeck.toml` in the current directory
/// 2. `~/.config/quizdeck/config.toml`
///
/// Environment variable override: `QUIZDECK_DATA_ROOT`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizdeckConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizdeck.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            toml::from_str::<QuizdeckConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizdeckConfig::default(),
    };

    if let Ok(root) = std::env::var("QUIZDECK_DATA_ROOT") {
        config.data_root = root;
    }
    config.data_root = resolve_env_vars(&config.data_root);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizdeck"))
}

/// Create a fetcher for the configured data root.
pub fn create_fetcher(config: &QuizdeckConfig) -> Result<Arc<dyn ResourceFetcher>> {
    if config.is_remote() {
        let timeout = config.request_timeout_secs.map(Duration::from_secs);
        Ok(Arc::new(HttpFetcher::new(&config.data_root, timeout)?))
    } else {
        Ok(Arc::new(DirFetcher::new(&config.data_root)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZDECK_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_QUIZDECK_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("https://${_QUIZDECK_TEST_VAR}/data"),
            "https://hello/data"
        );
        assert_eq!(resolve_env_vars("unterminated ${VAR"), "unterminated ${VAR");
        std::env::remove_var("_QUIZDECK_TEST_VAR");
    }

    #[test]
    fn resolved_values_are_not_expanded_again() {
        std::env::set_var("_QUIZDECK_SELF_REF", "${_QUIZDECK_SELF_REF}");
        assert_eq!(
            resolve_env_vars("${_QUIZDECK_SELF_REF}/x/${_QUIZDECK_SELF_REF}"),
            "${_QUIZDECK_SELF_REF}/x/${_QUIZDECK_SELF_REF}"
        );
        std::env::remove_var("_QUIZDECK_SELF_REF");
    }

    #[test]
    fn default_config() {
        let config = QuizdeckConfig::default();
        assert_eq!(config.data_root, "./public/data");
        assert_eq!(config.time_limit_secs, 60);
        assert_eq!(config.advance_delay_ms, 500);
        assert_eq!(config.tick_interval_ms, 1000);
        assert!(config.request_timeout_secs.is_none());
        assert_eq!(config.session_config().unwrap(), SessionConfig::default());
    }

    #[test]
    fn parse_partial_config() {
        let config: QuizdeckConfig = toml::from_str(
            r#"
data_root = "https://quiz.example.com/data"
time_limit_secs = 90
request_timeout_secs = 10
"#,
        )
        .unwrap();
        assert!(config.is_remote());
        assert_eq!(config.time_limit_secs, 90);
        assert_eq!(config.advance_delay_ms, 500);
        assert_eq!(config.request_timeout_secs, Some(10));
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let config = QuizdeckConfig {
            tick_interval_ms: 0,
            ..QuizdeckConfig::default()
        };
        assert!(config.session_config().is_err());
    }

    #[test]
    fn load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizdeck.toml");
        std::fs::write(&path, "data_root = \"/srv/quiz\"\nadvance_delay_ms = 250\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.advance_delay_ms, 250);
        assert_eq!(config.session_config().unwrap().advance_delay, Duration::from_millis(250));

        assert!(load_config_from(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn picks_fetcher_by_root() {
        let remote = QuizdeckConfig {
            data_root: "http://localhost:8080/data".into(),
            ..QuizdeckConfig::default()
        };
        assert_eq!(create_fetcher(&remote).unwrap().name(), "http");
        assert_eq!(create_fetcher(&QuizdeckConfig::default()).unwrap().name(), "dir");
    }
}
