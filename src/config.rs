//! Configuration management for sysload-reporter.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use sysload_reporter::parser::{DiskStatsLayout, NetDevLayout, DISKSTATS_NAME_COLUMN};
use sysload_reporter::procfs::{DEFAULT_IO_BUFFER_KB, MAX_IO_BUFFER_KB};
use sysload_reporter::sampler::DEFAULT_PROC_ROOT;
use sysload_reporter::SamplerConfig;
use tracing::info;

// Default configuration constants
pub const DEFAULT_INTERVAL_MS: u64 = 500;
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Reporter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Sources
    #[serde(alias = "proc-root")]
    pub proc_root: Option<PathBuf>,
    #[serde(alias = "io-buffer-kb")]
    pub io_buffer_kb: Option<usize>,

    // Sampling
    #[serde(alias = "interval-ms")]
    pub interval_ms: Option<u64>,
    /// Stop after this many samples (None = until interrupted)
    pub count: Option<u64>,

    // Row layouts
    #[serde(alias = "netdev-skip-lines")]
    pub netdev_skip_lines: Option<usize>,
    #[serde(alias = "netdev-rx-column")]
    pub netdev_rx_column: Option<usize>,
    #[serde(alias = "netdev-tx-column")]
    pub netdev_tx_column: Option<usize>,
    #[serde(alias = "diskstats-skip-lines")]
    pub diskstats_skip_lines: Option<usize>,
    #[serde(alias = "diskstats-read-column")]
    pub diskstats_read_column: Option<usize>,
    #[serde(alias = "diskstats-write-column")]
    pub diskstats_write_column: Option<usize>,

    // Failure policy
    #[serde(alias = "fail-fast")]
    pub fail_fast: Option<bool>,
    #[serde(alias = "cpu-reset-on-malformed")]
    pub cpu_reset_on_malformed: Option<bool>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let netdev = NetDevLayout::default();
        let diskstats = DiskStatsLayout::default();

        Self {
            proc_root: Some(PathBuf::from(DEFAULT_PROC_ROOT)),
            io_buffer_kb: Some(DEFAULT_IO_BUFFER_KB),
            interval_ms: Some(DEFAULT_INTERVAL_MS),
            count: None,
            netdev_skip_lines: Some(netdev.skip_lines),
            netdev_rx_column: Some(netdev.rx_column),
            netdev_tx_column: Some(netdev.tx_column),
            diskstats_skip_lines: Some(diskstats.skip_lines),
            diskstats_read_column: Some(diskstats.read_column),
            diskstats_write_column: Some(diskstats.write_column),
            fail_fast: Some(true),
            cpu_reset_on_malformed: Some(true),
            log_level: Some(DEFAULT_LOG_LEVEL.into()),
        }
    }
}

impl Config {
    /// Builds the sampler configuration, filling unset fields with defaults.
    pub fn sampler_config(&self) -> SamplerConfig {
        let defaults = SamplerConfig::default();

        SamplerConfig {
            proc_root: self.proc_root.clone().unwrap_or(defaults.proc_root),
            io_buffer_kb: self.io_buffer_kb.unwrap_or(defaults.io_buffer_kb),
            netdev: NetDevLayout {
                skip_lines: self.netdev_skip_lines.unwrap_or(defaults.netdev.skip_lines),
                rx_column: self.netdev_rx_column.unwrap_or(defaults.netdev.rx_column),
                tx_column: self.netdev_tx_column.unwrap_or(defaults.netdev.tx_column),
            },
            diskstats: DiskStatsLayout {
                skip_lines: self
                    .diskstats_skip_lines
                    .unwrap_or(defaults.diskstats.skip_lines),
                read_column: self
                    .diskstats_read_column
                    .unwrap_or(defaults.diskstats.read_column),
                write_column: self
                    .diskstats_write_column
                    .unwrap_or(defaults.diskstats.write_column),
            },
            fail_fast: self.fail_fast.unwrap_or(defaults.fail_fast),
            cpu_reset_on_malformed: self
                .cpu_reset_on_malformed
                .unwrap_or(defaults.cpu_reset_on_malformed),
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms.unwrap_or(DEFAULT_INTERVAL_MS)
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if cfg.interval_ms() == 0 {
        return Err("interval_ms must be greater than 0".into());
    }

    match cfg.io_buffer_kb {
        Some(0) => return Err("io_buffer_kb must be greater than 0".into()),
        Some(kb) if kb > MAX_IO_BUFFER_KB => {
            return Err(format!(
                "io_buffer_kb must be at most {} (got {})",
                MAX_IO_BUFFER_KB, kb
            )
            .into());
        }
        _ => {}
    }

    if cfg.count == Some(0) {
        return Err("count must be greater than 0 when set".into());
    }

    let sampler = cfg.sampler_config();

    if sampler.netdev.rx_column == sampler.netdev.tx_column {
        return Err(format!(
            "netdev_rx_column and netdev_tx_column must differ (both are {})",
            sampler.netdev.rx_column
        )
        .into());
    }

    let disk = sampler.diskstats;
    if disk.read_column == disk.write_column {
        return Err(format!(
            "diskstats_read_column and diskstats_write_column must differ (both are {})",
            disk.read_column
        )
        .into());
    }
    for (name, column) in [
        ("diskstats_read_column", disk.read_column),
        ("diskstats_write_column", disk.write_column),
    ] {
        if column <= DISKSTATS_NAME_COLUMN {
            return Err(format!(
                "{} must be greater than {} (major, minor and device name come first), got {}",
                name, DISKSTATS_NAME_COLUMN, column
            )
            .into());
        }
    }

    if let Some(level) = cfg.log_level.as_deref() {
        match level.to_lowercase().as_str() {
            "off" | "error" | "warn" | "info" | "debug" | "trace" => {}
            other => {
                return Err(format!(
                    "Invalid log_level '{}', expected off, error, warn, info, debug or trace",
                    other
                )
                .into());
            }
        }
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(root) = &args.proc_root {
        config.proc_root = Some(root.clone());
    }
    if let Some(interval) = args.interval_ms {
        config.interval_ms = Some(interval);
    }
    if args.count.is_some() {
        config.count = args.count;
    }
    if let Some(skip) = args.netdev_skip_lines {
        config.netdev_skip_lines = Some(skip);
    }
    if let Some(skip) = args.diskstats_skip_lines {
        config.diskstats_skip_lines = Some(skip);
    }
    if args.keep_going {
        config.fail_fast = Some(false);
    }

    Ok(config)
}

/// Configuration loading with multiple format support
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(format!("Config file not found: {}", p.display()).into());
            }
            p.to_path_buf()
        }
        None => {
            let defaults = [
                "/etc/sysload-reporter/config.yaml",
                "/etc/sysload-reporter/config.yml",
                "/etc/sysload-reporter/config.json",
                "./sysload-reporter.yaml",
                "./sysload-reporter.yml",
                "./sysload-reporter.json",
            ];

            match defaults.iter().find(|p| Path::new(p).exists()) {
                Some(found) => PathBuf::from(found),
                None => return Ok(Config::default()),
            }
        }
    };

    let content = fs::read_to_string(&path)?;

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let config: Config = serde_json::from_str(&content)?;
            info!("Loaded JSON configuration from: {}", path.display());
            Ok(config)
        }
        Some("toml") => {
            let config: Config = toml::from_str(&content)?;
            info!("Loaded TOML configuration from: {}", path.display());
            Ok(config)
        }
        _ => {
            // Default to YAML
            let config: Config = serde_yaml::from_str(&content)?;
            info!("Loaded YAML configuration from: {}", path.display());
            Ok(config)
        }
    }
}

/// Renders configuration in the requested format
pub fn render_config(
    config: &Config,
    format: &ConfigFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(output)
}

/// Shows configuration in requested format
pub fn show_config(
    config: &Config,
    format: ConfigFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render_config(config, &format)?);
    Ok(())
}
