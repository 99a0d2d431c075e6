//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "playbook-qa")]
#[command(about = "Question answering over the trading playbook")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: config.toml, then config.example.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load or build the index and serve the QA API
    Serve {
        /// Host address (default: from config)
        #[arg(long)]
        host: Option<String>,
        /// Port number (default: from config)
        #[arg(short, long)]
        port: Option<u16>,
        /// Answer every question with a fixed placeholder
        #[arg(long)]
        placeholder: bool,
    },
    /// Index management commands
    #[command(subcommand)]
    Index(IndexCommands),
    /// Ask a single question from the command line
    Ask {
        /// The question to ask
        question: String,
        /// Print the retrieved passages without generating an answer
        #[arg(long)]
        sources_only: bool,
    },
    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
pub enum IndexCommands {
    /// Build the index from the source CSV and persist it
    Build {
        /// Rebuild even if a persisted index exists
        #[arg(short, long)]
        force: bool,
    },
    /// Show metadata of the persisted index
    Info,
}
