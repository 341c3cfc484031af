//! Startup source validation for sysload-reporter.
//!
//! This module verifies that the /proc sources the reporter reads are present
//! and readable before the sampling loop starts.

use std::fs;
use std::path::{Path, PathBuf};
use sysload_reporter::SamplerConfig;
use tracing::{debug, error, info, warn};

/// Validate that every configured source can be opened
pub fn validate_sources(config: &SamplerConfig) -> Result<(), ValidationError> {
    info!("🔍 Validating /proc sources...");

    check_proc_root(&config.proc_root)?;

    let mut failures = Vec::new();
    for (name, path) in config.sources() {
        if let Err(e) = check_source(name, &path) {
            failures.push(e);
        }
    }

    match failures.len() {
        0 => {
            info!("✅ All /proc sources available");
            Ok(())
        }
        1 => Err(failures.remove(0)),
        n => {
            error!("❌ {} sources unavailable", n);
            Err(failures.remove(0))
        }
    }
}

/// Check the proc root exists and is a directory
fn check_proc_root(root: &Path) -> Result<(), ValidationError> {
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {
            debug!("proc root {} is accessible", root.display());
            Ok(())
        }
        Ok(_) => {
            error!("❌ {} is not a directory", root.display());
            Err(ValidationError::ProcRootMissing(root.to_path_buf()))
        }
        Err(e) => {
            error!("❌ Cannot access {}: {}", root.display(), e);
            error!("   Is the proc filesystem mounted? (mount -t proc proc /proc)");
            Err(ValidationError::ProcRootMissing(root.to_path_buf()))
        }
    }
}

/// Check a single source file can be opened for reading
fn check_source(name: &'static str, path: &Path) -> Result<(), ValidationError> {
    match fs::File::open(path) {
        Ok(_) => {
            debug!("{} source {} is readable", name, path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            error!("❌ {} source {} not found", name, path.display());
            Err(ValidationError::SourceMissing {
                name,
                path: path.to_path_buf(),
            })
        }
        Err(e) => {
            warn!("⚠️  {} source {} is not readable: {}", name, path.display(), e);
            Err(ValidationError::SourceUnreadable {
                name,
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("proc filesystem not found at {}", .0.display())]
    ProcRootMissing(PathBuf),

    #[error("{name} source {} not found", path.display())]
    SourceMissing { name: &'static str, path: PathBuf },

    #[error("{name} source {} not readable: {reason}", path.display())]
    SourceUnreadable {
        name: &'static str,
        path: PathBuf,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_proc_root() {
        let dir = tempfile::tempdir().unwrap();
        let config = SamplerConfig {
            proc_root: dir.path().join("proc"),
            ..SamplerConfig::default()
        };
        assert!(matches!(
            validate_sources(&config),
            Err(ValidationError::ProcRootMissing(_))
        ));
    }

    #[test]
    fn test_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("stat"), "cpu 1 2 3 4 5 6 7\n").unwrap();
        fs::write(dir.path().join("meminfo"), "MemTotal: 1 kB\n").unwrap();
        fs::write(dir.path().join("diskstats"), "").unwrap();

        let config = SamplerConfig {
            proc_root: dir.path().to_path_buf(),
            ..SamplerConfig::default()
        };
        match validate_sources(&config) {
            Err(ValidationError::SourceMissing { name, .. }) => assert_eq!(name, "network"),
            other => panic!("expected SourceMissing, got {:?}", other),
        }
    }

    #[test]
    fn test_all_sources_present() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("net")).unwrap();
        for name in ["stat", "meminfo", "net/dev", "diskstats"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let config = SamplerConfig {
            proc_root: dir.path().to_path_buf(),
            ..SamplerConfig::default()
        };
        assert!(validate_sources(&config).is_ok());
    }
}
