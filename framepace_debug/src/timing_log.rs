// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame timing log.
//!
//! [`TimingLogSink`] writes one line per executed frame:
//!
//! ```text
//! current: <timestamp> present cost: <latency>
//! ```
//!
//! Both values are nanoseconds of the loop clock: the timestamp is the clock
//! reading right after the present returned, the latency is the time the
//! present call took. Lines are only ever appended; an existing log file is
//! extended, never truncated.
//!
//! The first write failure is logged and kept in the sink; later frames are
//! dropped instead of failing the loop.

use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::Path;

use framepace_core::record::TimingRecorder;
use framepace_core::time::Timebase;
use framepace_core::timing::FrameTimingSample;

/// Appends `current: .. present cost: ..` lines to a writer.
pub struct TimingLogSink<W: Write> {
    writer: W,
    timebase: Timebase,
    lines: u64,
    error: Option<io::Error>,
}

impl<W: Write> std::fmt::Debug for TimingLogSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimingLogSink")
            .field("timebase", &self.timebase)
            .field("lines", &self.lines)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl TimingLogSink<LineWriter<File>> {
    /// Opens `path` for appending, creating it if needed.
    ///
    /// Every line is flushed as soon as it is complete, so the log survives
    /// an abnormal exit.
    pub fn append(path: impl AsRef<Path>, timebase: Timebase) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self::with_writer(LineWriter::new(file), timebase))
    }
}

impl<W: Write> TimingLogSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self {
            writer,
            timebase,
            lines: 0,
            error: None,
        }
    }

    /// Number of lines written successfully.
    #[must_use]
    pub fn lines_written(&self) -> u64 {
        self.lines
    }

    /// The first write failure, if any.
    #[must_use]
    pub fn error(&self) -> Option<&io::Error> {
        self.error.as_ref()
    }

    /// Flushes buffered lines and reports the first failure seen so far.
    pub fn flush(&mut self) -> io::Result<()> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()
    }

    /// Flushes and returns the writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> TimingRecorder for TimingLogSink<W> {
    fn on_frame(&mut self, sample: &FrameTimingSample) {
        if self.error.is_some() {
            return;
        }
        let result = writeln!(
            self.writer,
            "current: {} present cost: {}",
            sample.timestamp.to_nanos(self.timebase),
            sample.present_latency.to_nanos(self.timebase),
        );
        match result {
            Ok(()) => self.lines += 1,
            Err(err) => {
                log::warn!("timing log write failed after {} lines: {err}", self.lines);
                self.error = Some(err);
            }
        }
    }
}
