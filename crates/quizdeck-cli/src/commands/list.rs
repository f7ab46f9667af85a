//! The `quizdeck list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizdeck_core::ContentLoader;
use quizdeck_sources::create_fetcher;

pub async fn execute(config_path: Option<PathBuf>, data_root: Option<String>) -> Result<()> {
    let config = super::resolve_config(config_path, data_root)?;
    let folders = ContentLoader::new(create_fetcher(&config)?)
        .load_folders()
        .await?;

    if folders.is_empty() {
        println!("No content folders. Run `quizdeck init` to create sample content.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Folder", "Author", "Social", "Topics", "Questions"]);

    let mut total = 0;
    for folder in &folders {
        let count = folder.question_count();
        total += count;
        table.add_row(vec![
            Cell::new(&folder.id),
            Cell::new(&folder.document.user.username),
            Cell::new(&folder.document.user.social_link),
            Cell::new(folder.document.topics.len()),
            Cell::new(count),
        ]);
    }

    println!("{table}");
    println!("{} folders, {total} questions", folders.len());
    Ok(())
}
