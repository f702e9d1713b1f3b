use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "safespace")]
#[command(version)]
#[command(about = "A quiet place to talk things through", long_about = None)]
pub struct Cli {
    /// Model to use (e.g., gemini-3-flash-preview)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start a conversation (default)
    Chat,
    /// Write the default configuration file
    Init,
    /// Show configuration and credential status
    Status,
}
