// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sinks for frame-loop observations.
//!
//! [`TimingRecorder`] has one method per observation the loop makes. Every
//! method defaults to a no-op, so a sink implements only what it cares
//! about. The timing log is the [`on_frame`](TimingRecorder::on_frame) sink:
//! one call per executed frame, in frame order, with non-decreasing
//! timestamps.
//!
//! Recorders are append-only observers. They must not call back into the
//! loop and cannot fail it; a sink with fallible I/O keeps its own error
//! state.

use crate::capability::CompositionCapabilityReport;
use crate::probe::ProbeError;
use crate::surface::PresentError;
use crate::time::HostTime;
use crate::timing::FrameTimingSample;

/// Receives observations from the frame loop.
pub trait TimingRecorder {
    /// Called once per executed frame, right after the present returned.
    fn on_frame(&mut self, sample: &FrameTimingSample) {
        _ = sample;
    }

    /// Called when a present reported the window occluded.
    fn on_occluded(&mut self, frame_index: u64) {
        _ = frame_index;
    }

    /// Called when a present failed, fatal or not.
    fn on_present_error(&mut self, frame_index: u64, error: &PresentError) {
        _ = (frame_index, error);
    }

    /// Called after a fullscreen transition completed.
    fn on_fullscreen_changed(&mut self, fullscreen: bool, at: HostTime) {
        _ = (fullscreen, at);
    }

    /// Called with the outcome of an operator-requested capability probe.
    fn on_capability_report(&mut self, result: &Result<CompositionCapabilityReport, ProbeError>) {
        _ = result;
    }
}

impl<R: TimingRecorder + ?Sized> TimingRecorder for &mut R {
    fn on_frame(&mut self, sample: &FrameTimingSample) {
        (**self).on_frame(sample);
    }

    fn on_occluded(&mut self, frame_index: u64) {
        (**self).on_occluded(frame_index);
    }

    fn on_present_error(&mut self, frame_index: u64, error: &PresentError) {
        (**self).on_present_error(frame_index, error);
    }

    fn on_fullscreen_changed(&mut self, fullscreen: bool, at: HostTime) {
        (**self).on_fullscreen_changed(fullscreen, at);
    }

    fn on_capability_report(&mut self, result: &Result<CompositionCapabilityReport, ProbeError>) {
        (**self).on_capability_report(result);
    }
}

/// A [`TimingRecorder`] that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopRecorder;

impl TimingRecorder for NoopRecorder {}

/// Forwards every observation to two recorders, `first` then `second`.
///
/// Nest `Fanout`s to reach more sinks.
#[derive(Debug, Default)]
pub struct Fanout<A, B> {
    /// Receives each observation first.
    pub first: A,
    /// Receives each observation second.
    pub second: B,
}

impl<A, B> Fanout<A, B> {
    /// Pairs two recorders.
    #[must_use]
    pub const fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: TimingRecorder, B: TimingRecorder> TimingRecorder for Fanout<A, B> {
    fn on_frame(&mut self, sample: &FrameTimingSample) {
        self.first.on_frame(sample);
        self.second.on_frame(sample);
    }

    fn on_occluded(&mut self, frame_index: u64) {
        self.first.on_occluded(frame_index);
        self.second.on_occluded(frame_index);
    }

    fn on_present_error(&mut self, frame_index: u64, error: &PresentError) {
        self.first.on_present_error(frame_index, error);
        self.second.on_present_error(frame_index, error);
    }

    fn on_fullscreen_changed(&mut self, fullscreen: bool, at: HostTime) {
        self.first.on_fullscreen_changed(fullscreen, at);
        self.second.on_fullscreen_changed(fullscreen, at);
    }

    fn on_capability_report(&mut self, result: &Result<CompositionCapabilityReport, ProbeError>) {
        self.first.on_capability_report(result);
        self.second.on_capability_report(result);
    }
}
