// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame timing measurements.
//!
//! Each executed frame produces exactly one [`FrameTimingSample`]. The
//! scheduler stamps the clock immediately before and after the present call
//! and hands the sample to the [`TimingRecorder`](crate::record::TimingRecorder)
//! without keeping a copy.

use crate::time::{Duration, HostTime};

/// Timing of one present call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameTimingSample {
    /// Zero-based index of the executed frame.
    pub frame_index: u64,
    /// Clock reading taken right after the present call returned.
    pub timestamp: HostTime,
    /// Time spent inside the present call.
    pub present_latency: Duration,
}

impl FrameTimingSample {
    /// Builds a sample from the readings taken around a present call.
    ///
    /// A clock that misbehaves and reports `end < begin` yields a zero
    /// latency rather than wrapping.
    #[must_use]
    pub const fn from_bracket(frame_index: u64, begin: HostTime, end: HostTime) -> Self {
        Self {
            frame_index,
            timestamp: end,
            present_latency: end.saturating_duration_since(begin),
        }
    }

    /// The instant the present call started.
    #[must_use]
    pub const fn present_began(&self) -> HostTime {
        HostTime(self.timestamp.0 - self.present_latency.0)
    }
}
