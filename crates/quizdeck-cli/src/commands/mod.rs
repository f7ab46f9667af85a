pub mod init;
pub mod list;
pub mod play;
pub mod validate;

use std::path::PathBuf;

use anyhow::Result;

use quizdeck_sources::config::{load_config_from, QuizdeckConfig};

/// Load the config file and apply the `--data-root` override.
fn resolve_config(
    config_path: Option<PathBuf>,
    data_root: Option<String>,
) -> Result<QuizdeckConfig> {
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(root) = data_root {
        config.data_root = root;
    }
    Ok(config)
}
