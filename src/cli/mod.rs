//! CLI module
//!
//! Subcommands for driving the harness by hand.

pub mod commands;

pub use commands::{run_command, Command};
