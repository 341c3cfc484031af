//! Memory utilization from /proc/meminfo.

use std::path::Path;
use std::time::Instant;

use tracing::debug;

use crate::error::CollectError;
use crate::parser::parse_meminfo;
use crate::procfs;

/// The four /proc/meminfo quantities used for utilization, in kB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemorySnapshot {
    pub total_kb: u64,
    pub free_kb: u64,
    pub buffers_kb: u64,
    pub cached_kb: u64,
}

impl MemorySnapshot {
    /// Percentage of memory not free, buffered or cached:
    /// `100 * (1 - (free + buffers + cached) / total)`.
    pub fn utilization(&self) -> Result<f64, CollectError> {
        if self.total_kb == 0 {
            return Err(CollectError::MalformedInput("MemTotal is zero".to_string()));
        }
        let reclaimable = self.free_kb as f64 + self.buffers_kb as f64 + self.cached_kb as f64;
        Ok(100.0 * (1.0 - reclaimable / self.total_kb as f64))
    }
}

/// Reads /proc/meminfo in one call and parses the required fields.
pub fn read_memory_snapshot(path: &Path) -> Result<MemorySnapshot, CollectError> {
    let start = Instant::now();
    let content = procfs::read_all(path)?;
    let snapshot = parse_meminfo(&content)?;
    debug!(
        "read_memory_snapshot took: {} us ({:?})",
        start.elapsed().as_micros(),
        snapshot
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utilization() {
        let snapshot = MemorySnapshot {
            total_kb: 1000,
            free_kb: 200,
            buffers_kb: 100,
            cached_kb: 100,
        };
        assert!((snapshot.utilization().unwrap() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_utilization_zero_total() {
        assert!(matches!(
            MemorySnapshot::default().utilization(),
            Err(CollectError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_read_memory_snapshot_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meminfo");
        std::fs::write(
            &path,
            "MemTotal:        1000 kB\nMemFree:          200 kB\nMemAvailable:     500 kB\nBuffers:          100 kB\nCached:           100 kB\n",
        )
        .unwrap();
        let snapshot = read_memory_snapshot(&path).unwrap();
        assert_eq!(snapshot.total_kb, 1000);
        assert_eq!(snapshot.cached_kb, 100);
    }
}
