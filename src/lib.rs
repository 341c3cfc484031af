//! sysload-reporter library
//!
//! Reads host utilization straight from the kernel's /proc text files and
//! renders it as one continuously overwritten console line.
//!
//! # Components
//!
//! - **procfs**: opens and reads pseudo-files, whole or line by line
//! - **parser**: the fixed-position formats of /proc/stat, /proc/meminfo,
//!   /proc/net/dev and /proc/diskstats
//! - **collectors**: one reader per metric; CPU keeps the previous sample to
//!   compute a delta
//! - **sampler**: owns the collectors' configuration and state and decides
//!   which failures are substituted and which ones are fatal
//! - **report** and **runner**: the status line and the sampling loop
//!
//! # Usage
//!
//! ```rust,no_run
//! use sysload_reporter::{format_status_line, Sampler, SamplerConfig};
//!
//! let mut sampler = Sampler::new(SamplerConfig::default());
//! let sample = sampler.sample().expect("network and disk rows are readable");
//! println!("{}", format_status_line(&sample));
//! ```

pub mod collectors;
pub mod error;
pub mod parser;
pub mod procfs;
pub mod report;
pub mod runner;
pub mod sampler;

// Re-export main types for convenience
pub use collectors::cpu::{CpuDeltaTracker, CpuSample};
pub use collectors::diskstats::DiskCounters;
pub use collectors::memory::MemorySnapshot;
pub use collectors::netdev::NetworkCounters;
pub use error::CollectError;
pub use parser::{DiskStatsLayout, NetDevLayout};
pub use report::{format_status_line, StatusLine};
pub use runner::{run, RunError};
pub use sampler::{Sample, Sampler, SamplerConfig};
