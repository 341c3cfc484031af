//! Network interface packet counters from /proc/net/dev.
//!
//! One interface is reported: the row that follows `skip_lines` lines of the
//! file. With the default layout that is the first row after the two header
//! lines and the loopback row on a typical host.

use std::path::Path;
use std::time::Instant;

use tracing::debug;

use crate::error::CollectError;
use crate::parser::{parse_netdev_row, NetDevLayout};
use crate::procfs;

/// Packet counters of a single interface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NetworkCounters {
    pub name: String,
    pub packets_received: u64,
    pub packets_sent: u64,
}

/// Reads the interface row selected by `layout` from /proc/net/dev.
pub fn read_network_counters(
    path: &Path,
    layout: &NetDevLayout,
    buf_kb: usize,
) -> Result<NetworkCounters, CollectError> {
    let start = Instant::now();
    let row = procfs::read_row(path, layout.skip_lines, buf_kb)?;
    let counters = parse_netdev_row(&row, layout)?;
    debug!(
        "read_network_counters took: {} us ({:?})",
        start.elapsed().as_micros(),
        counters
    );
    Ok(counters)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NET_DEV: &str = "Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo: 2776770   11307    0    0    0     0          0         0  2776770   11307    0    0    0     0       0          0
  eth0: 1215645    2751    0    0    0     0          0         0  1782404    4324    0    0    0   427       0          0
";

    #[test]
    fn test_read_network_counters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dev");
        std::fs::write(&path, NET_DEV).unwrap();

        let counters = read_network_counters(&path, &NetDevLayout::default(), 4).unwrap();
        assert_eq!(counters.name, "eth0");
        assert_eq!(counters.packets_received, 2751);
        assert_eq!(counters.packets_sent, 4324);
    }

    #[test]
    fn test_read_network_counters_missing_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dev");
        std::fs::write(&path, NET_DEV.lines().take(3).collect::<Vec<_>>().join("\n")).unwrap();

        assert!(matches!(
            read_network_counters(&path, &NetDevLayout::default(), 4),
            Err(CollectError::RowUnavailable { row: 3, .. })
        ));
    }

    #[test]
    fn test_read_network_counters_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_network_counters(&dir.path().join("dev"), &NetDevLayout::default(), 4),
            Err(CollectError::NotFound { .. })
        ));
    }
}
