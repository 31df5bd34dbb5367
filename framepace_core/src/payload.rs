// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What gets drawn each frame.
//!
//! The content is not part of the measurement; it only has to change every
//! frame so that tearing and stale frames are visible on screen.

use alloc::format;
use alloc::string::String;

use kurbo::Rect;

use crate::surface::{BLACK, Label, Rgba};
use crate::time::{HostTime, Timebase};

/// The content of one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePayload {
    /// Color the render target is cleared to.
    pub clear_color: Rgba,
    /// Optional text drawn over the cleared target.
    pub label: Option<(String, Rect)>,
}

impl FramePayload {
    /// Borrows the label in the form the surface draws.
    #[must_use]
    pub fn label(&self) -> Option<Label<'_>> {
        self.label.as_ref().map(|(text, rect)| Label {
            text: text.as_str(),
            rect: *rect,
        })
    }
}

/// Produces the payload of each frame.
pub trait PayloadSource {
    /// Returns the payload for frame `frame_index`, rendered at `now`.
    fn payload(&mut self, frame_index: u64, now: HostTime, timebase: Timebase) -> FramePayload;
}

/// Black frame with a `"<prefix>-<milliseconds>"` label.
///
/// The milliseconds are those of the loop clock since its epoch, so the label
/// changes on every frame at the 1 ms pacing target.
#[derive(Clone, Debug)]
pub struct TimestampLabel {
    prefix: &'static str,
    rect: Rect,
}

impl TimestampLabel {
    /// Layout box used by the 700×400 pacing window.
    pub const DEFAULT_RECT: Rect = Rect::new(50.0, 50.0, 650.0, 300.0);

    /// Creates a label source with the given prefix.
    #[must_use]
    pub const fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            rect: Self::DEFAULT_RECT,
        }
    }

    /// Overrides the layout box.
    #[must_use]
    pub const fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }
}

impl PayloadSource for TimestampLabel {
    fn payload(&mut self, _frame_index: u64, now: HostTime, timebase: Timebase) -> FramePayload {
        let millis = now.to_nanos(timebase) / 1_000_000;
        FramePayload {
            clear_color: BLACK,
            label: Some((format!("{}-{millis}", self.prefix), self.rect)),
        }
    }
}

/// A fixed clear color and no label.
#[derive(Clone, Copy, Debug)]
pub struct SolidClear(pub Rgba);

impl PayloadSource for SolidClear {
    fn payload(&mut self, _frame_index: u64, _now: HostTime, _timebase: Timebase) -> FramePayload {
        FramePayload {
            clear_color: self.0,
            label: None,
        }
    }
}
