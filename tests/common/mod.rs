//! Shared fixtures: a fake proc root laid out like /proc.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use sysload_reporter::SamplerConfig;
use tempfile::TempDir;

pub const MEMINFO: &str = "MemTotal:        1000 kB
MemFree:          200 kB
MemAvailable:     500 kB
Buffers:          100 kB
Cached:           100 kB
SwapCached:        50 kB
";

pub const NET_DEV: &str = "Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo: 2776770   11307    0    0    0     0          0         0  2776770   11307    0    0    0     0       0          0
  eth0: 1215645     500    0    0    0     0          0         0  1782404     300    0    0    0     0       0          0
";

/// A /proc/diskstats with 13 loop devices ahead of `sda`.
pub fn diskstats(read: u64, written: u64) -> String {
    let mut content = String::new();
    for minor in 0..13 {
        content.push_str(&format!(
            "   7       {minor} loop{minor} 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0\n"
        ));
    }
    content.push_str(&format!(
        "   8       0 sda {read} 0 0 0 {written} 0 0 0 0 0 0 0 0 0 0 0 0\n"
    ));
    content
}

/// Aggregate CPU line with the busy remainder in "user".
pub fn stat(idle: u64, total: u64) -> String {
    format!(
        "cpu  {} 0 0 {} 0 0 0 0 0 0\ncpu0 {} 0 0 {} 0 0 0 0 0 0\nintr 12345\n",
        total - idle,
        idle,
        total - idle,
        idle
    )
}

/// Creates a proc root with all four sources populated.
pub fn fake_proc() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("net")).unwrap();
    write(dir.path(), "stat", &stat(100, 1000));
    write(dir.path(), "meminfo", MEMINFO);
    write(dir.path(), "net/dev", NET_DEV);
    write(dir.path(), "diskstats", &diskstats(1000, 2000));
    dir
}

pub fn write(root: &Path, name: &str, content: &str) {
    fs::write(root.join(name), content).unwrap();
}

pub fn config_for(root: &Path) -> SamplerConfig {
    SamplerConfig {
        proc_root: root.to_path_buf(),
        ..SamplerConfig::default()
    }
}
