// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads a recording from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][trace-format] JSON to the given writer.
//! Each present becomes a complete (`"X"`) slice spanning the present call;
//! everything else is an instant event.
//!
//! [trace-format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use framepace_core::time::Timebase;

use crate::recorder::RecordedEvent;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
/// Events without a timestamp of their own (occlusion, errors, probe
/// reports) are placed at the end of the last frame seen before them.
pub fn export(
    events: &[RecordedEvent],
    timebase: Timebase,
    writer: &mut dyn Write,
) -> io::Result<()> {
    let mut out: Vec<Value> = Vec::with_capacity(events.len());
    let mut cursor = 0.0;

    for recorded in events {
        match recorded {
            RecordedEvent::Frame(s) => {
                cursor = ticks_to_us(s.timestamp.ticks(), timebase);
                out.push(json!({
                    "ph": "X",
                    "name": "Present",
                    "cat": "Frame",
                    "ts": ticks_to_us(s.present_began().ticks(), timebase),
                    "dur": ticks_to_us(s.present_latency.ticks(), timebase),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": s.frame_index,
                    }
                }));
            }
            RecordedEvent::Occluded { frame_index } => {
                out.push(json!({
                    "ph": "i",
                    "name": "Occluded",
                    "cat": "Frame",
                    "ts": cursor,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": frame_index,
                    }
                }));
            }
            RecordedEvent::PresentError { frame_index, error } => {
                out.push(json!({
                    "ph": "i",
                    "name": "PresentError",
                    "cat": "Frame",
                    "ts": cursor,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": frame_index,
                        "fatal": error.is_fatal(),
                        "error": error.to_string(),
                    }
                }));
            }
            RecordedEvent::FullscreenChanged { fullscreen, at } => {
                cursor = ticks_to_us(at.ticks(), timebase);
                out.push(json!({
                    "ph": "i",
                    "name": "Fullscreen",
                    "cat": "Surface",
                    "ts": cursor,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "fullscreen": fullscreen,
                    }
                }));
            }
            RecordedEvent::CapabilityReport(result) => {
                let args = match result {
                    Ok(report) => json!({
                        "raw": report.raw(),
                        "fullscreen": report.fullscreen(),
                        "windowed": report.windowed(),
                        "cursor_stretched": report.cursor_stretched(),
                    }),
                    Err(err) => json!({
                        "error": err.to_string(),
                    }),
                };
                out.push(json!({
                    "ph": "i",
                    "name": "CapabilityReport",
                    "cat": "Probe",
                    "ts": cursor,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": args,
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &out)?;
    Ok(())
}

fn ticks_to_us(ticks: u64, timebase: Timebase) -> f64 {
    timebase.ticks_to_nanos(ticks) as f64 / 1000.0
}
