//! Text extraction from /proc pseudo-files.
//!
//! Whole-file reads are used for small keyed sources such as /proc/meminfo.
//! Tabular sources are streamed line by line so that skipping to a fixed row
//! never materializes more than one line at a time.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::CollectError;

/// Default read buffer for line-streamed sources, in KB.
pub const DEFAULT_IO_BUFFER_KB: usize = 64;

/// Largest accepted read buffer, in KB.
pub const MAX_IO_BUFFER_KB: usize = 16 * 1024;

/// Reads a pseudo-file fully in a single call.
pub fn read_all(path: &Path) -> Result<String, CollectError> {
    let content = fs::read_to_string(path).map_err(|e| CollectError::from_io(path, e))?;
    trace!("read {} bytes from {}", content.len(), path.display());
    Ok(content)
}

/// Sequential line reader over an open pseudo-file.
///
/// The underlying handle is closed when the reader is dropped, on every exit path.
pub struct LineReader {
    path: PathBuf,
    reader: BufReader<File>,
    lines_read: usize,
}

impl LineReader {
    /// Opens `path` with a read buffer of `buf_kb` kilobytes.
    pub fn open(path: &Path, buf_kb: usize) -> Result<Self, CollectError> {
        let file = File::open(path).map_err(|e| CollectError::from_io(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::with_capacity(buf_kb.clamp(1, MAX_IO_BUFFER_KB) * 1024, file),
            lines_read: 0,
        })
    }

    /// Returns the next line without its terminator, or `None` at end of input.
    pub fn read_line(&mut self) -> Result<Option<String>, CollectError> {
        let mut line = String::new();
        let n = self
            .reader
            .read_line(&mut line)
            .map_err(|e| CollectError::from_io(&self.path, e))?;
        if n == 0 {
            return Ok(None);
        }
        self.lines_read += 1;

        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    /// Skips `count` lines. Fails with `RowUnavailable` if the input ends first.
    pub fn skip_lines(&mut self, count: usize) -> Result<(), CollectError> {
        for _ in 0..count {
            if self.read_line()?.is_none() {
                return Err(self.row_unavailable(count));
            }
        }
        Ok(())
    }

    /// Number of lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    fn row_unavailable(&self, row: usize) -> CollectError {
        CollectError::RowUnavailable {
            path: self.path.clone(),
            row,
            available: self.lines_read,
        }
    }
}

/// Reads the first line of `path`.
pub fn read_first_line(path: &Path, buf_kb: usize) -> Result<String, CollectError> {
    read_row(path, 0, buf_kb)
}

/// Skips `skip` lines of `path` and returns the one that follows.
pub fn read_row(path: &Path, skip: usize, buf_kb: usize) -> Result<String, CollectError> {
    let mut reader = LineReader::open(path, buf_kb)?;
    reader.skip_lines(skip)?;
    match reader.read_line()? {
        Some(line) => Ok(line),
        None => Err(reader.row_unavailable(skip)),
    }
}
