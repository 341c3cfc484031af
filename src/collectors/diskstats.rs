//! Block device counters from /proc/diskstats.
//!
//! The device is chosen by its row position in the kernel's enumeration order,
//! which depends on the host's disks and kernel version. Adjust
//! `DiskStatsLayout::skip_lines` to select a different device.

use std::path::Path;
use std::time::Instant;

use tracing::debug;

use crate::error::CollectError;
use crate::parser::{parse_diskstats_row, DiskStatsLayout};
use crate::procfs;

/// Read and write counters of a single block device.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiskCounters {
    pub name: String,
    pub blocks_read: u64,
    pub blocks_written: u64,
}

/// Reads the device row selected by `layout` from /proc/diskstats.
pub fn read_disk_counters(
    path: &Path,
    layout: &DiskStatsLayout,
    buf_kb: usize,
) -> Result<DiskCounters, CollectError> {
    let start = Instant::now();
    let row = procfs::read_row(path, layout.skip_lines, buf_kb)?;
    let counters = parse_diskstats_row(&row, layout)?;
    debug!(
        "read_disk_counters took: {} us ({:?})",
        start.elapsed().as_micros(),
        counters
    );
    Ok(counters)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diskstats_with_target(target: &str) -> String {
        let mut content = String::new();
        for minor in 0..13 {
            content.push_str(&format!(
                "   7       {} loop{} 10 0 20 0 0 0 0 0 0 0 0 0 0 0 0\n",
                minor, minor
            ));
        }
        content.push_str(target);
        content.push('\n');
        content
    }

    #[test]
    fn test_read_disk_counters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diskstats");
        std::fs::write(
            &path,
            diskstats_with_target("   8       0 sda 1000 0 0 0 2000 0 0 0"),
        )
        .unwrap();

        let counters = read_disk_counters(&path, &DiskStatsLayout::default(), 4).unwrap();
        assert_eq!(counters.name, "sda");
        assert_eq!(counters.blocks_read, 1000);
        assert_eq!(counters.blocks_written, 2000);
    }

    #[test]
    fn test_read_disk_counters_short_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diskstats");
        std::fs::write(&path, diskstats_with_target("   8       0 sda 1000")).unwrap();

        assert!(matches!(
            read_disk_counters(&path, &DiskStatsLayout::default(), 4),
            Err(CollectError::ColumnMismatch { .. })
        ));
    }

    #[test]
    fn test_read_disk_counters_too_few_devices() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diskstats");
        std::fs::write(&path, "   8       0 sda 1 0 0 0 2 0 0 0\n").unwrap();

        assert!(matches!(
            read_disk_counters(&path, &DiskStatsLayout::default(), 4),
            Err(CollectError::RowUnavailable {
                row: 13,
                available: 1,
                ..
            })
        ));
    }
}
