// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory collaborators shared by the loop tests.

use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use crate::capability::CompositionCapabilityReport;
use crate::clock::ManualClock;
use crate::event::{EventSource, Pump};
use crate::policy::{PresentRequest, PresentationPolicy};
use crate::probe::{CapabilityProbe, ProbeError};
use crate::surface::{
    Label, PresentError, PresentOutcome, PresentationSurface, Rgba, SurfaceError,
};
use crate::time::Duration;

/// One present observed by [`MockSurface`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct PresentRecord {
    pub(crate) request: PresentRequest,
    pub(crate) view_generation: u32,
    pub(crate) outcome: Result<PresentOutcome, PresentError>,
}

/// A surface that records presents and tracks render-target rebuilds.
pub(crate) struct MockSurface<'a> {
    policy: PresentationPolicy,
    fullscreen: Rc<Cell<bool>>,
    view_generation: u32,
    view_bound: bool,
    released: bool,
    outcomes: VecDeque<Result<PresentOutcome, PresentError>>,
    cost: Option<(&'a ManualClock, u64)>,
    presents: Rc<RefCell<Vec<PresentRecord>>>,
    releases: Rc<Cell<u32>>,
}

impl<'a> MockSurface<'a> {
    pub(crate) fn new(policy: PresentationPolicy) -> Self {
        Self {
            policy,
            fullscreen: Rc::default(),
            view_generation: 0,
            view_bound: false,
            released: false,
            outcomes: VecDeque::new(),
            cost: None,
            presents: Rc::default(),
            releases: Rc::default(),
        }
    }

    /// Every present advances `clock` by `nanos`.
    pub(crate) fn with_present_cost(mut self, clock: &'a ManualClock, nanos: u64) -> Self {
        self.cost = Some((clock, nanos));
        self
    }

    /// Scripted present results, consumed in order; afterwards presents succeed.
    pub(crate) fn with_outcomes(
        mut self,
        outcomes: impl IntoIterator<Item = Result<PresentOutcome, PresentError>>,
    ) -> Self {
        self.outcomes.extend(outcomes);
        self
    }

    pub(crate) fn present_log(&self) -> Rc<RefCell<Vec<PresentRecord>>> {
        Rc::clone(&self.presents)
    }

    pub(crate) fn release_count(&self) -> Rc<Cell<u32>> {
        Rc::clone(&self.releases)
    }

    /// The live fullscreen state, writable to model the OS leaving
    /// fullscreen behind the loop's back.
    pub(crate) fn fullscreen_state(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.fullscreen)
    }
}

impl PresentationSurface for MockSurface<'_> {
    fn policy(&self) -> PresentationPolicy {
        self.policy
    }

    fn clear(&mut self, _color: Rgba) -> Result<(), SurfaceError> {
        if self.released {
            return Err(SurfaceError::Released);
        }
        self.view_bound = true;
        Ok(())
    }

    fn draw_label(&mut self, label: &Label<'_>) -> Result<(), SurfaceError> {
        assert!(self.view_bound, "label drawn before clear");
        assert!(!label.text.is_empty());
        Ok(())
    }

    fn present(&mut self, request: PresentRequest) -> Result<PresentOutcome, PresentError> {
        if self.released {
            return Err(PresentError::Released);
        }
        if !request.is_valid_for(self.policy) {
            return Err(PresentError::PolicyViolation {
                policy: self.policy,
                request,
            });
        }
        assert!(self.view_bound, "present without a bound render target");
        if let Some((clock, nanos)) = self.cost {
            clock.advance(Duration(nanos));
        }
        let outcome = self
            .outcomes
            .pop_front()
            .unwrap_or(Ok(PresentOutcome::Presented));
        self.presents.borrow_mut().push(PresentRecord {
            request,
            view_generation: self.view_generation,
            outcome,
        });
        self.view_bound = false;
        outcome
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen.get()
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), SurfaceError> {
        if self.released {
            return Err(SurfaceError::Released);
        }
        // The old view is dropped before the buffers are resized.
        self.view_bound = false;
        self.fullscreen.set(fullscreen);
        self.view_generation += 1;
        Ok(())
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.releases.set(self.releases.get() + 1);
        }
    }
}

/// Replays a fixed sequence of pumps.
///
/// After the script runs out the queue reads empty, either forever or for a
/// fixed number of polls followed by a quit.
pub(crate) struct ScriptedEvents {
    script: VecDeque<Pump>,
    quit_after: Option<u64>,
    reports: Vec<Result<CompositionCapabilityReport, ProbeError>>,
}

impl ScriptedEvents {
    pub(crate) fn new(script: impl IntoIterator<Item = Pump>) -> Self {
        Self {
            script: script.into_iter().collect(),
            quit_after: None,
            reports: Vec::new(),
        }
    }

    /// An empty queue that requests quit after `polls` idle polls.
    pub(crate) fn quit_after(polls: u64) -> Self {
        Self::new([]).then_quit_after(polls)
    }

    pub(crate) fn then_quit_after(mut self, polls: u64) -> Self {
        self.quit_after = Some(polls);
        self
    }

    pub(crate) fn reports(&self) -> &[Result<CompositionCapabilityReport, ProbeError>] {
        &self.reports
    }
}

impl EventSource for ScriptedEvents {
    fn pump(&mut self) -> Pump {
        if let Some(pump) = self.script.pop_front() {
            return pump;
        }
        match &mut self.quit_after {
            None => Pump::Empty,
            Some(0) => Pump::Quit,
            Some(left) => {
                *left -= 1;
                Pump::Empty
            }
        }
    }

    fn show_capability_report(&mut self, result: &Result<CompositionCapabilityReport, ProbeError>) {
        self.reports.push(*result);
    }
}

/// A probe with a canned answer.
pub(crate) struct FixedProbe(Result<CompositionCapabilityReport, ProbeError>);

impl FixedProbe {
    pub(crate) fn supported(raw: u32) -> Self {
        Self(Ok(CompositionCapabilityReport::from_raw(raw)))
    }

    pub(crate) fn failing(error: ProbeError) -> Self {
        Self(Err(error))
    }
}

impl CapabilityProbe for FixedProbe {
    fn probe(&self) -> Result<CompositionCapabilityReport, ProbeError> {
        self.0
    }
}
