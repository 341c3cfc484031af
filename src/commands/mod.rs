//! CLI command implementations for sysload-reporter.
//!
//! This module provides implementations for all CLI subcommands:
//! - `check`: Source validation
//! - `config`: Configuration file generation
//! - `test`: Sampling with per-metric output

pub mod check;
pub mod config;

// Re-export command functions
pub use check::command_check;
pub use config::command_config;
pub use test::command_test;
