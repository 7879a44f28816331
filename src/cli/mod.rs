//! CLI module - Command-line interface for Reelscout
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

pub use commands::{cmd_search, cmd_serve, cmd_trending, cmd_watch};

/// Reelscout - movie discovery with trending searches
#[derive(Parser)]
#[command(name = "reelscout")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the catalog once and count the search
    #[command(alias = "s")]
    Search {
        /// Search query; leave empty for popular movies
        query: Vec<String>,
    },

    /// Show the most searched terms
    #[command(alias = "t")]
    Trending,

    /// Interactive search: each line read from stdin is the current search text
    #[command(alias = "w")]
    Watch,

    /// Run the HTTP API
    #[command(alias = "daemon")]
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}
