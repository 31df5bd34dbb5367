// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable loop output.
//!
//! [`PrettyPrintSink`] implements [`TimingRecorder`] and writes one line per
//! observation to a [`Write`](std::io::Write) destination (default: stderr).
//! Times are converted to microseconds using a [`Timebase`].

use std::io::Write;

use framepace_core::capability::CompositionCapabilityReport;
use framepace_core::probe::ProbeError;
use framepace_core::record::TimingRecorder;
use framepace_core::surface::PresentError;
use framepace_core::time::{HostTime, Timebase};
use framepace_core::timing::FrameTimingSample;

/// Writes human-readable loop lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            timebase,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    fn ticks_to_us(&self, ticks: u64) -> f64 {
        self.timebase.ticks_to_nanos(ticks) as f64 / 1000.0
    }

    fn host_us(&self, t: HostTime) -> f64 {
        self.ticks_to_us(t.ticks())
    }
}

impl<W: Write> TimingRecorder for PrettyPrintSink<W> {
    fn on_frame(&mut self, s: &FrameTimingSample) {
        let _ = writeln!(
            self.writer,
            "[frame] index={} at={:.1}µs present={:.1}µs",
            s.frame_index,
            self.host_us(s.timestamp),
            self.ticks_to_us(s.present_latency.ticks()),
        );
    }

    fn on_occluded(&mut self, frame_index: u64) {
        let _ = writeln!(self.writer, "[occluded] frame={frame_index}");
    }

    fn on_present_error(&mut self, frame_index: u64, error: &PresentError) {
        let severity = if error.is_fatal() { "FATAL" } else { "transient" };
        let _ = writeln!(
            self.writer,
            "[present:error] frame={frame_index} {severity} {error}",
        );
    }

    fn on_fullscreen_changed(&mut self, fullscreen: bool, at: HostTime) {
        let _ = writeln!(
            self.writer,
            "[fullscreen] {} at {:.1}µs",
            if fullscreen { "on" } else { "off" },
            self.host_us(at),
        );
    }

    fn on_capability_report(&mut self, result: &Result<CompositionCapabilityReport, ProbeError>) {
        let _ = match result {
            Ok(report) => writeln!(self.writer, "[capability] {report}"),
            Err(err) => writeln!(self.writer, "[capability] failed: {err}"),
        };
    }
}
