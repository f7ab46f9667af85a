//! The `quizdeck init` command.

use std::path::Path;

use anyhow::Result;

const SAMPLE_FOLDER: &str = "1234567-2024";

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("quizdeck.toml"), SAMPLE_CONFIG)?;

    let data = Path::new("public/data");
    std::fs::create_dir_all(data.join(SAMPLE_FOLDER))?;
    write_if_missing(&data.join("index.json"), SAMPLE_INDEX)?;
    write_if_missing(&data.join(SAMPLE_FOLDER).join("info.json"), SAMPLE_DOCUMENT)?;

    println!("\nNext steps:");
    println!("  1. Add your own folders under public/data and list them in index.json");
    println!("  2. Run: quizdeck validate");
    println!("  3. Run: quizdeck play");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizdeck configuration

# Directory or http(s) base URL holding index.json and <folder>/info.json
data_root = "./public/data"

time_limit_secs = 60
advance_delay_ms = 500
tick_interval_ms = 1000

# Per-request timeout for http(s) data roots; omit for none
# request_timeout_secs = 10
"#;

const SAMPLE_INDEX: &str = r#"{
  "folders": ["1234567-2024"]
}
"#;

const SAMPLE_DOCUMENT: &str = r#"{
  "user": {
    "username": "quizdeck",
    "profileImage": "https://avatars.githubusercontent.com/u/0",
    "socialLink": "https://github.com/quizdeck"
  },
  "topics": [
    {
      "topic": "Rust",
      "questions": [
        {
          "question": "Which keyword introduces an immutable variable binding?",
          "options": ["var", "let", "const", "static"],
          "answer": "let"
        },
        {
          "question": "Which trait must a type implement to be printed with {:?}?",
          "options": ["Display", "Debug", "Clone", "Default"],
          "answer": "Debug"
        }
      ]
    },
    {
      "topic": "Networking",
      "questions": [
        {
          "question": "Which HTTP status code means Not Found?",
          "options": ["200", "301", "404", "500"],
          "answer": "404"
        }
      ]
    }
  ]
}
"#;
