//! Command-line interface for tune-bridge.
//!
//! A thin stand-in for a chat or web front end: resolve a link, inspect how
//! a link is classified, and manage the config file.

mod commands;

pub use commands::{Cli, Commands, run_command};
