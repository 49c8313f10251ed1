//! CLI argument parsing for librarycatalog

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lc")]
#[command(
    author,
    version,
    about = "Single-user library catalog",
    long_about = None,
    after_help = "Without a command the interactive menu starts.\nLogs are written to: ~/.local/share/librarycatalog/logs/lc.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Catalog file (overrides catalog-file from the config)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the interactive menu (default)
    Menu,

    /// List every book
    List {
        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Find books whose title contains the given text (case-insensitive)
    Find {
        #[arg(required = true)]
        title: String,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the book with the given ISBN
    Show {
        #[arg(required = true)]
        isbn: String,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// List borrowed books
    Borrowed {
        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a book
    Add {
        /// ISBN-13 (13 digits)
        #[arg(long)]
        isbn: String,

        /// Title (up to 50 characters)
        #[arg(long)]
        title: String,

        /// Authors, separated by commas
        #[arg(long, default_value = "")]
        authors: String,

        /// Year of publication
        #[arg(long, allow_negative_numbers = true)]
        year: i32,

        /// Genres, separated by commas
        #[arg(long, default_value = "")]
        genre: String,
    },

    /// Borrow a book as of today
    Borrow {
        #[arg(required = true)]
        isbn: String,
    },

    /// Return a borrowed book
    Return {
        #[arg(required = true)]
        isbn: String,
    },

    /// Delete a book
    Delete {
        #[arg(required = true)]
        isbn: String,
    },
}

/// Output format for listing commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}
