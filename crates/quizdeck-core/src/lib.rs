//! quizdeck-core: content loading, flattening, and the quiz session.
//!
//! This crate defines the content data model, the loader that fetches it,
//! and the state machine that runs a timed quiz over the flattened questions.

pub mod error;
pub mod flatten;
pub mod loader;
pub mod model;
pub mod runtime;
pub mod session;
pub mod traits;
pub mod validate;

pub use error::{FetchError, LoadError};
pub use flatten::flatten;
pub use loader::ContentLoader;
pub use runtime::{spawn_session, SessionHandle};
pub use session::{Phase, QuizResult, QuizSession, SessionConfig, SessionState};
