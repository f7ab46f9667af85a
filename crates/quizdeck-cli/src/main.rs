//! quizdeck CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizdeck", version, about = "Timed multiple-choice quizzes from JSON content")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the quiz in the terminal
    Play {
        /// Content root: directory or http(s) base URL
        #[arg(long)]
        data_root: Option<String>,

        /// Quiz-wide time limit in seconds
        #[arg(long)]
        time_limit: Option<u32>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check content for authoring mistakes
    Validate {
        /// Content root: directory or http(s) base URL
        #[arg(long)]
        data_root: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List content authors with topic and question counts
    List {
        /// Content root: directory or http(s) base URL
        #[arg(long)]
        data_root: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and sample content
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            data_root,
            time_limit,
            config,
        } => commands::play::execute(config, data_root, time_limit).await,
        Commands::Validate { data_root, config } => {
            commands::validate::execute(config, data_root).await
        }
        Commands::List { data_root, config } => commands::list::execute(config, data_root).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
