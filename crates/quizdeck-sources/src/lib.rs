//! quizdeck-sources: content source integrations.
//!
//! Implements the `ResourceFetcher` trait for HTTP(S) data roots and local
//! directories, plus an in-memory mock, and loads the quizdeck configuration.

pub mod config;
pub mod dir;
pub mod http;
pub mod mock;

pub use config::{create_fetcher, load_config_from, QuizdeckConfig};
pub use dir::DirFetcher;
pub use http::HttpFetcher;
pub use mock::MockFetcher;
