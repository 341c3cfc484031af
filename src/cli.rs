//! CLI arguments and subcommands for sysload-reporter.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "sysload-reporter",
    about = "Console reporter for CPU, memory, network and disk utilization",
    long_about = "Console reporter for CPU, memory, network and disk utilization.\n\n\
                  Samples /proc/stat, /proc/meminfo, /proc/net/dev and /proc/diskstats at a \
                  fixed interval and prints a single status line that is overwritten in place \
                  until interrupted with Ctrl+C.",
    version,
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log level (logs are written to stderr)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Root of the proc filesystem
    #[arg(long)]
    pub proc_root: Option<PathBuf>,

    /// Sampling interval in milliseconds
    #[arg(short = 'i', long)]
    pub interval_ms: Option<u64>,

    /// Stop after N samples instead of running until interrupted
    #[arg(short = 'n', long)]
    pub count: Option<u64>,

    /// Lines of /proc/net/dev to skip before the reported interface row
    #[arg(long)]
    pub netdev_skip_lines: Option<usize>,

    /// Lines of /proc/diskstats to skip before the reported device row
    #[arg(long)]
    pub diskstats_skip_lines: Option<usize>,

    /// Keep sampling when the network or disk source cannot be read
    #[arg(long)]
    pub keep_going: bool,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that every /proc source exists and parses
    Check,

    /// Generate configuration files
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },

    /// Take a few samples and print every metric on its own line
    Test {
        /// Number of samples
        #[arg(short = 'n', long, default_value_t = 2)]
        iterations: usize,

        /// Also show interface/device names and raw memory figures
        #[arg(long)]
        verbose: bool,
    },
}
