//! CLI module for Maxchat.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Maxchat - chat with a single document
///
/// Loads one document (web page, YouTube transcript, PDF, CSV, text file or
/// a folder of files) and answers questions grounded in its text.
#[derive(Parser, Debug)]
#[command(name = "maxchat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a document and start an interactive chat about it
    Chat {
        /// URL, YouTube link/id, file path or directory
        input: String,

        /// Document kind (site, youtube, pdf, csv, txt, dir); detected from
        /// the input when omitted
        #[arg(short, long)]
        kind: Option<String>,

        /// LLM provider (groq, openai)
        #[arg(short, long)]
        provider: Option<String>,

        /// Model to use (defaults to the provider's first model)
        #[arg(short, long)]
        model: Option<String>,

        /// API key (overrides config file and environment variable)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Load a document and print its text (for piping into other tools)
    Load {
        /// URL, YouTube link/id, file path or directory
        input: String,

        /// Document kind (site, youtube, pdf, csv, txt, dir); detected from
        /// the input when omitted
        #[arg(short, long)]
        kind: Option<String>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
