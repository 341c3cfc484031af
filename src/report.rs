//! Console rendering of samples as a single, continuously overwritten line.

use std::io::{self, Write};

use crate::sampler::Sample;

/// Formats one status line without the leading carriage return.
pub fn format_status_line(sample: &Sample) -> String {
    format!(
        "CPU Util: {:2.1}% Memory Util: {:2.1}% Network Packets Received: {} Network Packets Sent: {} Device Blocks Read: {} Device Blocks Written: {}",
        sample.cpu_percent,
        sample.memory_percent,
        sample.network.packets_received,
        sample.network.packets_sent,
        sample.disk.blocks_read,
        sample.disk.blocks_written,
    )
}

/// Writes status lines over each other on a terminal-like writer.
pub struct StatusLine<W: Write> {
    out: W,
    last_width: usize,
    open: bool,
}

impl<W: Write> StatusLine<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_width: 0,
            open: false,
        }
    }

    /// Overwrites the current line with `sample`.
    ///
    /// A line shorter than the previous one is padded so no stale characters remain.
    pub fn render(&mut self, sample: &Sample) -> io::Result<()> {
        let line = format_status_line(sample);
        let width = line.chars().count();
        let pad = self.last_width.saturating_sub(width);

        write!(self.out, "\r{}{}", line, " ".repeat(pad))?;
        self.out.flush()?;

        self.last_width = width;
        self.open = true;
        Ok(())
    }

    /// Replaces the status line with the final `Done!` line.
    pub fn finish(&mut self) -> io::Result<()> {
        write!(self.out, "\rDone!   \n")?;
        self.out.flush()?;
        self.open = false;
        self.last_width = 0;
        Ok(())
    }

    /// Ends an open status line so diagnostics start on a fresh line.
    pub fn abort(&mut self) -> io::Result<()> {
        if self.open {
            writeln!(self.out)?;
            self.out.flush()?;
            self.open = false;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
