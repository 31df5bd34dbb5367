// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TimingRecorder`] and keeps every
//! observation, in arrival order, as a [`RecordedEvent`]. Feed the recording
//! to [`chrome::export`](crate::chrome::export) or inspect it directly.

use framepace_core::capability::CompositionCapabilityReport;
use framepace_core::probe::ProbeError;
use framepace_core::record::TimingRecorder;
use framepace_core::surface::PresentError;
use framepace_core::time::HostTime;
use framepace_core::timing::FrameTimingSample;

/// One recorded observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A frame was presented (or attempted).
    Frame(FrameTimingSample),
    /// The window was occluded during the present of `frame_index`.
    Occluded {
        /// Frame counter.
        frame_index: u64,
    },
    /// The present of `frame_index` failed.
    PresentError {
        /// Frame counter.
        frame_index: u64,
        /// The failure.
        error: PresentError,
    },
    /// A fullscreen transition completed.
    FullscreenChanged {
        /// New state.
        fullscreen: bool,
        /// When the transition completed.
        at: HostTime,
    },
    /// A capability probe ran.
    CapabilityReport(Result<CompositionCapabilityReport, ProbeError>),
}

/// A [`TimingRecorder`] that keeps everything in memory.
#[derive(Clone, Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded events in arrival order.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Iterates the frame samples only.
    pub fn frames(&self) -> impl Iterator<Item = &FrameTimingSample> + '_ {
        self.events.iter().filter_map(|e| match e {
            RecordedEvent::Frame(sample) => Some(sample),
            _ => None,
        })
    }

    /// Consumes the recorder and returns the events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }
}

impl TimingRecorder for RecorderSink {
    fn on_frame(&mut self, sample: &FrameTimingSample) {
        self.events.push(RecordedEvent::Frame(*sample));
    }

    fn on_occluded(&mut self, frame_index: u64) {
        self.events.push(RecordedEvent::Occluded { frame_index });
    }

    fn on_present_error(&mut self, frame_index: u64, error: &PresentError) {
        self.events.push(RecordedEvent::PresentError {
            frame_index,
            error: *error,
        });
    }

    fn on_fullscreen_changed(&mut self, fullscreen: bool, at: HostTime) {
        self.events
            .push(RecordedEvent::FullscreenChanged { fullscreen, at });
    }

    fn on_capability_report(&mut self, result: &Result<CompositionCapabilityReport, ProbeError>) {
        self.events.push(RecordedEvent::CapabilityReport(*result));
    }
}
