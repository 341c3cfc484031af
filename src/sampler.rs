//! The metric readers and the policy applied to their failures.
//!
//! [`Sampler`] owns the source configuration and the CPU delta state. Its
//! per-metric readers return typed results; [`Sampler::sample`] is the single
//! place that decides which failures are replaced with a neutral value and
//! which ones stop the reporter.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::collectors::cpu::{read_cpu_sample, CpuDeltaTracker};
use crate::collectors::diskstats::{read_disk_counters, DiskCounters};
use crate::collectors::memory::read_memory_snapshot;
use crate::collectors::netdev::{read_network_counters, NetworkCounters};
use crate::error::CollectError;
use crate::parser::{DiskStatsLayout, NetDevLayout};
use crate::procfs::DEFAULT_IO_BUFFER_KB;

pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Sources, row layouts and failure policy for a [`Sampler`].
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerConfig {
    pub proc_root: PathBuf,
    pub io_buffer_kb: usize,
    pub netdev: NetDevLayout,
    pub diskstats: DiskStatsLayout,
    /// Stop on network/disk failures instead of reusing the last counters.
    pub fail_fast: bool,
    /// Reset the CPU baseline to zero when the CPU line is malformed.
    pub cpu_reset_on_malformed: bool,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            proc_root: PathBuf::from(DEFAULT_PROC_ROOT),
            io_buffer_kb: DEFAULT_IO_BUFFER_KB,
            netdev: NetDevLayout::default(),
            diskstats: DiskStatsLayout::default(),
            fail_fast: true,
            cpu_reset_on_malformed: true,
        }
    }
}

impl SamplerConfig {
    pub fn stat_path(&self) -> PathBuf {
        self.proc_root.join("stat")
    }

    pub fn meminfo_path(&self) -> PathBuf {
        self.proc_root.join("meminfo")
    }

    pub fn netdev_path(&self) -> PathBuf {
        self.proc_root.join("net").join("dev")
    }

    pub fn diskstats_path(&self) -> PathBuf {
        self.proc_root.join("diskstats")
    }

    /// All sources with a short display name.
    pub fn sources(&self) -> [(&'static str, PathBuf); 4] {
        [
            ("cpu", self.stat_path()),
            ("memory", self.meminfo_path()),
            ("network", self.netdev_path()),
            ("disk", self.diskstats_path()),
        ]
    }
}

/// One tick's worth of readings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sample {
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub network: NetworkCounters,
    pub disk: DiskCounters,
}

/// Which metrics are currently being substituted, so warnings are logged on
/// the transition rather than on every tick.
#[derive(Debug, Default)]
struct Degraded {
    cpu: bool,
    memory: bool,
    network: bool,
    disk: bool,
}

/// Long-lived reader of all metrics.
#[derive(Debug)]
pub struct Sampler {
    config: SamplerConfig,
    cpu: CpuDeltaTracker,
    degraded: Degraded,
    last_network: NetworkCounters,
    last_disk: DiskCounters,
}

impl Sampler {
    pub fn new(config: SamplerConfig) -> Self {
        Self {
            config,
            cpu: CpuDeltaTracker::new(),
            degraded: Degraded::default(),
            last_network: NetworkCounters::default(),
            last_disk: DiskCounters::default(),
        }
    }

    /// CPU busy percentage since the previous call; `0.0` on the first call.
    ///
    /// A malformed line resets the baseline to zero when
    /// `cpu_reset_on_malformed` is set, before the error is returned.
    pub fn cpu_utilization(&mut self) -> Result<f64, CollectError> {
        match read_cpu_sample(&self.config.stat_path(), self.config.io_buffer_kb) {
            Ok(sample) => Ok(self.cpu.update(sample)),
            Err(e) => {
                if self.config.cpu_reset_on_malformed && !e.is_io() {
                    debug!("Resetting CPU baseline after malformed sample");
                    self.cpu.reset_to_zero();
                }
                Err(e)
            }
        }
    }

    /// Memory utilization percentage.
    pub fn memory_utilization(&self) -> Result<f64, CollectError> {
        read_memory_snapshot(&self.config.meminfo_path())?.utilization()
    }

    /// Packet counters of the configured interface row.
    pub fn network_counters(&self) -> Result<NetworkCounters, CollectError> {
        read_network_counters(
            &self.config.netdev_path(),
            &self.config.netdev,
            self.config.io_buffer_kb,
        )
    }

    /// Block counters of the configured device row.
    pub fn disk_counters(&self) -> Result<DiskCounters, CollectError> {
        read_disk_counters(
            &self.config.diskstats_path(),
            &self.config.diskstats,
            self.config.io_buffer_kb,
        )
    }

    /// Reads every metric once.
    ///
    /// CPU and memory failures are reported as `0.0`. Network and disk
    /// failures are returned when `fail_fast` is set; otherwise the last good
    /// counters are reused. Either every field of the sample is filled in or
    /// an error is returned.
    pub fn sample(&mut self) -> Result<Sample, CollectError> {
        let network = match self.network_counters() {
            Ok(counters) => {
                recovered(&mut self.degraded.network, "network");
                self.last_network = counters.clone();
                counters
            }
            Err(e) if self.config.fail_fast => return Err(e),
            Err(e) => {
                degrade(&mut self.degraded.network, "network", &e);
                self.last_network.clone()
            }
        };

        let disk = match self.disk_counters() {
            Ok(counters) => {
                recovered(&mut self.degraded.disk, "disk");
                self.last_disk = counters.clone();
                counters
            }
            Err(e) if self.config.fail_fast => return Err(e),
            Err(e) => {
                degrade(&mut self.degraded.disk, "disk", &e);
                self.last_disk.clone()
            }
        };

        let cpu_percent = match self.cpu_utilization() {
            Ok(value) => {
                recovered(&mut self.degraded.cpu, "cpu");
                value
            }
            Err(e) => {
                degrade(&mut self.degraded.cpu, "cpu", &e);
                0.0
            }
        };

        let memory_percent = match self.memory_utilization() {
            Ok(value) => {
                recovered(&mut self.degraded.memory, "memory");
                value
            }
            Err(e) => {
                degrade(&mut self.degraded.memory, "memory", &e);
                0.0
            }
        };

        Ok(Sample {
            cpu_percent,
            memory_percent,
            network,
            disk,
        })
    }
}

fn degrade(flag: &mut bool, metric: &str, error: &CollectError) {
    if *flag {
        debug!("{} still unavailable: {}", metric, error);
    } else {
        warn!("⚠️  {} reading failed, reporting a neutral value: {}", metric, error);
        *flag = true;
    }
}

fn recovered(flag: &mut bool, metric: &str) {
    if *flag {
        info!("✅ {} reading recovered", metric);
        *flag = false;
    }
}

