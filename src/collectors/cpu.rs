//! Aggregate CPU utilization from /proc/stat.
//!
//! Utilization is a delta between two samples of the kernel's cumulative tick
//! counters, so the previous sample is retained in a [`CpuDeltaTracker`].

use std::path::Path;
use std::time::Instant;

use tracing::debug;

use crate::error::CollectError;
use crate::parser::{parse_cpu_line, CPU_FIELDS};
use crate::procfs;

/// Index of the idle counter within a sample.
pub const IDLE_INDEX: usize = 3;

/// One reading of the aggregate CPU line: user, nice, system, idle, iowait,
/// irq and softirq ticks, plus their sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuSample {
    pub counters: [u64; CPU_FIELDS],
    pub total: u64,
}

impl CpuSample {
    /// Builds a sample, or `None` if the counters do not sum within `u64`.
    pub fn new(counters: [u64; CPU_FIELDS]) -> Option<Self> {
        let total = counters
            .iter()
            .try_fold(0u64, |sum, &counter| sum.checked_add(counter))?;
        Some(Self { counters, total })
    }

    /// The all-zero sample used as a degenerate baseline.
    pub fn zeroed() -> Self {
        Self::default()
    }

    pub fn idle(&self) -> u64 {
        self.counters[IDLE_INDEX]
    }
}

/// Busy percentage between two samples: `(1 - Δidle / Δtotal) * 100`.
///
/// Returns exactly `0.0` when the total did not advance, instead of dividing
/// by zero. The result is not clamped.
pub fn utilization_between(previous: &CpuSample, current: &CpuSample) -> f64 {
    if current.total <= previous.total {
        return 0.0;
    }
    let delta_total = (current.total - previous.total) as f64;
    let delta_idle = current.idle() as f64 - previous.idle() as f64;

    (1.0 - delta_idle / delta_total) * 100.0
}

/// Keeps the previous CPU sample between calls.
#[derive(Debug, Default)]
pub struct CpuDeltaTracker {
    previous: Option<CpuSample>,
}

impl CpuDeltaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes utilization against the retained sample, then retains `sample`.
    ///
    /// The first call has nothing to compare against and returns `0.0`.
    pub fn update(&mut self, sample: CpuSample) -> f64 {
        let utilization = match &self.previous {
            Some(previous) => utilization_between(previous, &sample),
            None => 0.0,
        };
        self.previous = Some(sample);
        utilization
    }

    /// Replaces the baseline with the all-zero sample.
    ///
    /// The next update then measures against boot time rather than the last
    /// good reading.
    pub fn reset_to_zero(&mut self) {
        self.previous = Some(CpuSample::zeroed());
    }

    pub fn previous(&self) -> Option<&CpuSample> {
        self.previous.as_ref()
    }
}

/// Reads and parses the aggregate line (the first line) of /proc/stat.
pub fn read_cpu_sample(path: &Path, buf_kb: usize) -> Result<CpuSample, CollectError> {
    let start = Instant::now();
    let line = procfs::read_first_line(path, buf_kb)?;
    let sample = parse_cpu_line(&line)?;
    debug!(
        "read_cpu_sample took: {} us (total={}, idle={})",
        start.elapsed().as_micros(),
        sample.total,
        sample.idle()
    );
    Ok(sample)
}
