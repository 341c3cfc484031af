//! Config command implementation.
//!
//! Generates configuration files in various formats.

use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::{render_config, Config};

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let output = output.unwrap_or_else(|| PathBuf::from("sysload-reporter.yaml"));

    let mut content = render_config(&config, &format)?;
    if commented && matches!(format, ConfigFormat::Yaml) {
        content = add_config_comments(content);
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# sysload-reporter Configuration
# ==============================
#
# Sources
# -------
# proc_root: "/proc"             # Root of the proc filesystem
# io_buffer_kb: 64               # Read buffer for line-streamed sources
#
# Sampling
# --------
# interval_ms: 500               # Time between samples
# count: null                    # Stop after N samples (null = until Ctrl+C)
#
# Row Layouts
# -----------
# Rows are selected by position, not by name. Check /proc/net/dev and
# /proc/diskstats on the target host before changing these.
# netdev_skip_lines: 3           # Lines before the reported interface row
# netdev_rx_column: 1            # Counter column for received packets
# netdev_tx_column: 9            # Counter column for sent packets
# diskstats_skip_lines: 13       # Lines before the reported device row
# diskstats_read_column: 3       # Row column for blocks read
# diskstats_write_column: 7      # Row column for blocks written
#
# Failure Policy
# --------------
# fail_fast: true                # Exit when network/disk rows cannot be read
# cpu_reset_on_malformed: true   # Reset the CPU baseline after a malformed line
#
# Logging
# -------
# log_level: "warn"              # off, error, warn, info, debug, trace
"#;

    format!("{comments}\n{yaml}")
}
