// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contract between the frame loop and the OS event layer.
//!
//! The event layer owns window creation and message dispatch. The loop only
//! asks it, once per iteration, to service at most one pending event without
//! blocking, and learns from the answer whether to keep pumping, go idle,
//! perform a semantic UI action, or stop.

use crate::capability::CompositionCapabilityReport;
use crate::probe::ProbeError;

/// A semantic action requested by the operator through the UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UiAction {
    /// Flip exclusive fullscreen.
    ToggleFullscreen,
    /// Run the capability probe and show the report.
    ReportCapabilities,
}

/// Result of one non-blocking pump.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pump {
    /// An event was dispatched; more may be pending.
    Dispatched,
    /// An event was dispatched and mapped to a UI action.
    Action(UiAction),
    /// The queue was empty.
    Empty,
    /// A quit request was observed. The loop exits on this poll.
    Quit,
}

/// The OS event layer as seen by the frame loop.
pub trait EventSource {
    /// Services at most one pending event. Must not block.
    fn pump(&mut self) -> Pump;

    /// Receives the outcome of a [`UiAction::ReportCapabilities`] request so
    /// that the triggering collaborator can display it.
    fn show_capability_report(&mut self, result: &Result<CompositionCapabilityReport, ProbeError>) {
        _ = result;
    }
}
