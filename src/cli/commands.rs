//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// cloudstore-core transport CLI
#[derive(Parser, Debug)]
#[command(name = "cloudstore-core")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Transport options file (YAML)
    #[arg(short, long, global = true)]
    pub options: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute one request and print the response
    Request {
        /// Absolute target URL
        url: String,

        /// HTTP method
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,

        /// Request header as 'Name: value' (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Request body
        #[arg(short, long)]
        data: Option<String>,

        /// Stream the response body to stdout instead of buffering it
        #[arg(long)]
        stream: bool,

        /// Only print status and headers
        #[arg(long)]
        head_only: bool,
    },

    /// Print the effective transport options
    Options,
}
