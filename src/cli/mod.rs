pub mod commands;
pub mod output;

use crate::errors::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sk")]
#[command(about = "Stackscope - Graphite stack snapshots for the current worktree")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the stack snapshot for a worktree
    Snapshot {
        /// Repository holding the stack metadata (defaults to the worktree)
        #[arg(long)]
        repo: Option<PathBuf>,

        /// Worktree to inspect (defaults to the enclosing repository)
        #[arg(long)]
        worktree: Option<PathBuf>,

        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse saved `gt log short` output (reads stdin when no file is given)
    Parse {
        /// File containing the captured report
        file: Option<PathBuf>,
    },

    /// Check tool availability and repository setup
    Doctor,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., tool.program)
        key: String,
        /// Configuration value
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// List all configuration values
    List,

    /// Reset a configuration value to its default
    Unset {
        /// Configuration key
        key: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        self.setup_logging();

        if self.no_color {
            console::set_colors_enabled(false);
        }

        match self.command {
            Commands::Snapshot {
                repo,
                worktree,
                json,
            } => commands::snapshot::run(repo, worktree, json).await,
            Commands::Parse { file } => commands::parse::run(file).await,
            Commands::Doctor => commands::doctor::run().await,
            Commands::Config { action } => commands::config::run(action).await,
            Commands::Version => commands::version::run().await,
        }
    }

    fn setup_logging(&self) {
        let level = if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };

        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .with_writer(std::io::stderr)
            .without_time();

        if self.no_color {
            subscriber.with_ansi(false).init();
        } else {
            subscriber.init();
        }
    }
}
