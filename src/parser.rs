//! Field parsing for the /proc text formats.
//!
//! Each source has its own contract:
//! - /proc/stat: an aggregate counter line, a label followed by CPU tick counters
//! - /proc/meminfo: `Label:   value kB` lines located by label
//! - /proc/net/dev and /proc/diskstats: fixed rows split into whitespace
//!   columns and read by position, not by header name
//!
//! Positions follow the kernel's text ABI. They are not self-describing, so
//! they are carried in [`NetDevLayout`] and [`DiskStatsLayout`] instead of
//! being discovered at runtime.

use serde::{Deserialize, Serialize};

use crate::collectors::cpu::CpuSample;
use crate::collectors::diskstats::DiskCounters;
use crate::collectors::memory::MemorySnapshot;
use crate::collectors::netdev::NetworkCounters;
use crate::error::CollectError;

/// Number of counters read from the aggregate CPU line
/// (user, nice, system, idle, iowait, irq, softirq).
pub const CPU_FIELDS: usize = 7;

/// Labels required from /proc/meminfo, in the order they are parsed.
pub const MEMINFO_LABELS: [&str; 4] = ["MemTotal:", "MemFree:", "Buffers:", "Cached:"];

/// Interface and device names longer than this are truncated.
pub const MAX_NAME_LENGTH: usize = 20;

/// Column of the device name in a /proc/diskstats row.
pub const DISKSTATS_NAME_COLUMN: usize = 2;

/// Row and column positions for /proc/net/dev.
///
/// Columns index the counters after the `name:` prefix. The kernel lists the
/// eight receive counters before the eight transmit counters, so with the
/// default layout column 1 is received packets and column 9 is sent packets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetDevLayout {
    pub skip_lines: usize,
    pub rx_column: usize,
    pub tx_column: usize,
}

impl Default for NetDevLayout {
    fn default() -> Self {
        Self {
            skip_lines: 3,
            rx_column: 1,
            tx_column: 9,
        }
    }
}

/// Row and column positions for /proc/diskstats.
///
/// Columns index the whole row: `major minor name c3 c4 ...`.
/// The default skip count assumes the target device is the 14th row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskStatsLayout {
    pub skip_lines: usize,
    pub read_column: usize,
    pub write_column: usize,
}

impl Default for DiskStatsLayout {
    fn default() -> Self {
        Self {
            skip_lines: 13,
            read_column: 3,
            write_column: 7,
        }
    }
}

/// Parses an aggregate CPU line such as `cpu  4705 356 584 3699 23 23 0 0 0 0`.
///
/// The leading label is discarded. The first seven integers after it are
/// required; anything beyond them (steal, guest, ...) is ignored.
pub fn parse_cpu_line(line: &str) -> Result<CpuSample, CollectError> {
    let mut tokens = line.split_whitespace();
    if tokens.next().is_none() {
        return Err(CollectError::MalformedInput("empty CPU line".to_string()));
    }

    let mut counters = [0u64; CPU_FIELDS];
    for (i, slot) in counters.iter_mut().enumerate() {
        let token = tokens.next().ok_or_else(|| {
            CollectError::MalformedInput(format!(
                "expected {} CPU counters, found {}",
                CPU_FIELDS, i
            ))
        })?;
        *slot = token.parse().map_err(|_| {
            CollectError::MalformedInput(format!(
                "CPU counter {} `{}` is not an unsigned integer",
                i, token
            ))
        })?;
    }

    CpuSample::new(counters).ok_or_else(|| {
        CollectError::MalformedInput("CPU counters overflow when summed".to_string())
    })
}

/// Parses the four required quantities (in kB) out of a /proc/meminfo blob.
pub fn parse_meminfo(text: &str) -> Result<MemorySnapshot, CollectError> {
    let [total, free, buffers, cached] = MEMINFO_LABELS;

    Ok(MemorySnapshot {
        total_kb: labeled_value(text, total)?,
        free_kb: labeled_value(text, free)?,
        buffers_kb: labeled_value(text, buffers)?,
        cached_kb: labeled_value(text, cached)?,
    })
}

/// Finds the first line containing `label` and parses the integer right after it.
/// The trailing unit token is ignored.
fn labeled_value(text: &str, label: &'static str) -> Result<u64, CollectError> {
    let rest = text
        .lines()
        .find_map(|line| line.split_once(label).map(|(_, rest)| rest))
        .ok_or(CollectError::MissingField(label))?;

    let value = rest
        .split_whitespace()
        .next()
        .ok_or(CollectError::MissingField(label))?;

    value.parse().map_err(|_| {
        CollectError::MalformedInput(format!(
            "{} value `{}` is not an unsigned integer",
            label, value
        ))
    })
}

/// Parses one /proc/net/dev interface row such as
/// `  eth0: 1234 56 0 0 0 0 0 0 4321 65 0 0 0 0 0 0`.
pub fn parse_netdev_row(
    line: &str,
    layout: &NetDevLayout,
) -> Result<NetworkCounters, CollectError> {
    let needed = layout.rx_column.max(layout.tx_column) + 1;

    // Wide counters can be glued to the name ("eth0:123"), so split on ':' first.
    let (name, counters) = line
        .split_once(':')
        .ok_or_else(|| CollectError::ColumnMismatch {
            expected: needed + 1,
            found: line.split_whitespace().count(),
        })?;

    let name = name.trim();
    if name.is_empty() {
        return Err(CollectError::MalformedInput(
            "network row has an empty interface name".to_string(),
        ));
    }

    let columns: Vec<&str> = counters.split_whitespace().collect();
    if columns.len() < needed {
        return Err(CollectError::ColumnMismatch {
            expected: needed,
            found: columns.len(),
        });
    }

    Ok(NetworkCounters {
        name: bounded_name(name),
        packets_received: parse_column(&columns, layout.rx_column)?,
        packets_sent: parse_column(&columns, layout.tx_column)?,
    })
}

/// Parses one /proc/diskstats row such as `   8       0 sda 1000 0 0 0 2000 0 0 0`.
pub fn parse_diskstats_row(
    line: &str,
    layout: &DiskStatsLayout,
) -> Result<DiskCounters, CollectError> {
    let needed = layout
        .read_column
        .max(layout.write_column)
        .max(DISKSTATS_NAME_COLUMN)
        + 1;

    let columns: Vec<&str> = line.split_whitespace().collect();
    if columns.len() < needed {
        return Err(CollectError::ColumnMismatch {
            expected: needed,
            found: columns.len(),
        });
    }

    Ok(DiskCounters {
        name: bounded_name(columns[DISKSTATS_NAME_COLUMN]),
        blocks_read: parse_column(&columns, layout.read_column)?,
        blocks_written: parse_column(&columns, layout.write_column)?,
    })
}

fn parse_column(columns: &[&str], index: usize) -> Result<u64, CollectError> {
    let token = columns.get(index).ok_or(CollectError::ColumnMismatch {
        expected: index + 1,
        found: columns.len(),
    })?;
    token.parse().map_err(|_| {
        CollectError::MalformedInput(format!(
            "column {} `{}` is not an unsigned integer",
            index, token
        ))
    })
}

fn bounded_name(name: &str) -> String {
    name.chars().take(MAX_NAME_LENGTH).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEMINFO: &str = "MemTotal:       16314020 kB
MemFree:         1093212 kB
MemAvailable:    9530344 kB
Buffers:          612884 kB
Cached:          7655128 kB
SwapCached:         1024 kB
Active:          8374428 kB
";

    #[test]
    fn test_parse_cpu_line() {
        let sample = parse_cpu_line("cpu  4705 356 584 3699 23 23 0 0 0 0").unwrap();
        assert_eq!(sample.counters, [4705, 356, 584, 3699, 23, 23, 0]);
        assert_eq!(sample.idle(), 3699);
        assert_eq!(sample.total, 4705 + 356 + 584 + 3699 + 23 + 23);
    }

    #[test]
    fn test_parse_cpu_line_exactly_seven() {
        let sample = parse_cpu_line("cpu 1 2 3 4 5 6 7").unwrap();
        assert_eq!(sample.total, 28);
    }

    #[test]
    fn test_parse_cpu_line_too_few_counters() {
        let err = parse_cpu_line("cpu 1 2 3 4 5 6").unwrap_err();
        assert!(matches!(err, CollectError::MalformedInput(_)));
        assert!(err.to_string().contains("found 6"));
    }

    #[test]
    fn test_parse_cpu_line_counter_sum_overflow() {
        let err = parse_cpu_line("cpu 18446744073709551615 1 0 0 0 0 0").unwrap_err();
        assert!(matches!(err, CollectError::MalformedInput(_)));

        let max = parse_cpu_line("cpu 18446744073709551615 0 0 0 0 0 0").unwrap();
        assert_eq!(max.total, u64::MAX);
    }

    #[test]
    fn test_parse_cpu_line_non_numeric() {
        assert!(matches!(
            parse_cpu_line("cpu 1 2 x 4 5 6 7"),
            Err(CollectError::MalformedInput(_))
        ));
        assert!(matches!(
            parse_cpu_line("   "),
            Err(CollectError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_parse_meminfo() {
        let snapshot = parse_meminfo(MEMINFO).unwrap();
        assert_eq!(snapshot.total_kb, 16314020);
        assert_eq!(snapshot.free_kb, 1093212);
        assert_eq!(snapshot.buffers_kb, 612884);
        // Must pick "Cached:" and not the later "SwapCached:" line.
        assert_eq!(snapshot.cached_kb, 7655128);
    }

    #[test]
    fn test_parse_meminfo_missing_label() {
        let text = "MemTotal: 1000 kB\nMemFree: 200 kB\nCached: 100 kB\n";
        match parse_meminfo(text) {
            Err(CollectError::MissingField(label)) => assert_eq!(label, "Buffers:"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_meminfo_bad_value() {
        let text = "MemTotal: lots kB\nMemFree: 200 kB\nBuffers: 1 kB\nCached: 100 kB\n";
        assert!(matches!(
            parse_meminfo(text),
            Err(CollectError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_parse_netdev_row_kernel_layout() {
        let line = "  eth0: 98765 500 0 0 0 0 0 0 43210 300 0 0 0 0 0 0";
        let counters = parse_netdev_row(line, &NetDevLayout::default()).unwrap();
        assert_eq!(counters.name, "eth0");
        assert_eq!(counters.packets_received, 500);
        assert_eq!(counters.packets_sent, 300);
    }

    #[test]
    fn test_parse_netdev_row_glued_name() {
        let line = "enp3s0:123456789012 7 0 0 0 0 0 0 5 8 0 0 0 0 0 0";
        let counters = parse_netdev_row(line, &NetDevLayout::default()).unwrap();
        assert_eq!(counters.name, "enp3s0");
        assert_eq!(counters.packets_received, 7);
        assert_eq!(counters.packets_sent, 8);
    }

    #[test]
    fn test_parse_netdev_row_custom_columns() {
        let layout = NetDevLayout {
            skip_lines: 3,
            rx_column: 0,
            tx_column: 8,
        };
        let line = "eth0: 500 0 0 0 0 0 0 0 300 0 0 0 0 0 0 0";
        let counters = parse_netdev_row(line, &layout).unwrap();
        assert_eq!(counters.name, "eth0");
        assert_eq!(counters.packets_received, 500);
        assert_eq!(counters.packets_sent, 300);
    }

    #[test]
    fn test_parse_netdev_row_short() {
        let err = parse_netdev_row("eth0: 1 2 3", &NetDevLayout::default()).unwrap_err();
        assert!(matches!(
            err,
            CollectError::ColumnMismatch {
                expected: 10,
                found: 3
            }
        ));
        assert!(matches!(
            parse_netdev_row("no colon here", &NetDevLayout::default()),
            Err(CollectError::ColumnMismatch { .. })
        ));
    }

    #[test]
    fn test_parse_diskstats_row() {
        let counters =
            parse_diskstats_row("8 0 sda 1000 0 0 0 2000 0 0 0", &DiskStatsLayout::default())
                .unwrap();
        assert_eq!(counters.name, "sda");
        assert_eq!(counters.blocks_read, 1000);
        assert_eq!(counters.blocks_written, 2000);
    }

    #[test]
    fn test_parse_diskstats_row_short() {
        assert!(matches!(
            parse_diskstats_row("8 0 sda 1000 0", &DiskStatsLayout::default()),
            Err(CollectError::ColumnMismatch {
                expected: 8,
                found: 5
            })
        ));
    }

    #[test]
    fn test_names_are_bounded() {
        let line = "8 0 a-very-long-device-name-indeed 1 0 0 0 2";
        let counters = parse_diskstats_row(line, &DiskStatsLayout::default()).unwrap();
        assert_eq!(counters.name.chars().count(), MAX_NAME_LENGTH);
        assert_eq!(counters.name, "a-very-long-device-n");
    }
}
