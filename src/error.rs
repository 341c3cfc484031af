//! Error taxonomy for reading and parsing /proc sources.
//!
//! Readers only report what went wrong. Whether a failure is substituted with a
//! neutral value or ends the process is decided by [`crate::sampler::Sampler`].

use std::io;
use std::path::{Path, PathBuf};

/// Errors produced while extracting or parsing a pseudo-file.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("{} not found", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("row {row} unavailable in {} (only {available} lines)", path.display())]
    RowUnavailable {
        path: PathBuf,
        row: usize,
        available: usize,
    },

    #[error("expected at least {expected} columns, found {found}")]
    ColumnMismatch { expected: usize, found: usize },
}

impl CollectError {
    /// Maps an I/O error on `path`, keeping "not found" distinct from other failures.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            CollectError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            CollectError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// True for the variants that mean the source itself could not be read.
    pub fn is_io(&self) -> bool {
        matches!(self, CollectError::NotFound { .. } | CollectError::Io { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_not_found() {
        let err = CollectError::from_io(
            Path::new("/proc/nope"),
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, CollectError::NotFound { .. }));
        assert!(err.is_io());
        assert_eq!(err.to_string(), "/proc/nope not found");
    }

    #[test]
    fn test_from_io_other() {
        let err = CollectError::from_io(
            Path::new("/proc/stat"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, CollectError::Io { .. }));
        assert!(err.to_string().starts_with("failed to read /proc/stat"));
    }

    #[test]
    fn test_parse_errors_are_not_io() {
        assert!(!CollectError::MissingField("MemTotal:").is_io());
        assert!(!CollectError::ColumnMismatch {
            expected: 8,
            found: 3
        }
        .is_io());
    }
}
