// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timing log, pretty-printing, and Chrome trace export for framepace.
//!
//! This crate provides [`TimingRecorder`](framepace_core::record::TimingRecorder)
//! implementations for measurement runs and post-mortem analysis:
//!
//! - [`timing_log::TimingLogSink`]: the per-frame timing log, one
//!   `current: <t> present cost: <latency>` line per frame.
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: in-memory recording of every observation.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from a
//!   recording.

pub mod chrome;
pub mod pretty;
pub mod recorder;
pub mod timing_log;
