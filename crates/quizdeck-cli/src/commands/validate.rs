//! The `quizdeck validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizdeck_core::validate::{check_index_coverage, validate_content};
use quizdeck_core::ContentLoader;
use quizdeck_sources::{create_fetcher, DirFetcher};

pub async fn execute(config_path: Option<PathBuf>, data_root: Option<String>) -> Result<()> {
    let config = super::resolve_config(config_path, data_root)?;
    let loader = ContentLoader::new(create_fetcher(&config)?);

    let mut warnings = Vec::new();

    // Index/disk agreement can only be checked for local content.
    if !config.is_remote() {
        let index = loader.load_index().await?;
        let on_disk = DirFetcher::new(&config.data_root)
            .list_folders()
            .await
            .with_context(|| format!("failed to list {}", config.data_root))?;
        warnings.extend(check_index_coverage(&index.folders, &on_disk));
    }

    let folders = match loader.load_folders().await {
        Ok(folders) => folders,
        Err(e) => {
            for w in &warnings {
                println!("  WARNING: {w}");
            }
            return Err(e.into());
        }
    };

    let questions: usize = folders.iter().map(|f| f.question_count()).sum();
    println!("Content: {} folders, {questions} questions", folders.len());

    warnings.extend(validate_content(&folders));
    for w in &warnings {
        println!("  WARNING: {w}");
    }

    if warnings.is_empty() {
        println!("All content valid.");
        Ok(())
    } else {
        anyhow::bail!("{} warning(s) found", warnings.len())
    }
}
