//! CLI module
//!
//! Command-line interface for exercising the transport by hand.
//!
//! # Commands
//!
//! - `request` - Execute one HTTP request through the blocking transport
//! - `options` - Print the effective transport options as YAML

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
