// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Busy-polled frame pacing.
//!
//! [`FramePacingScheduler`] is a cooperative, single-threaded loop with two
//! states:
//!
//! ```text
//!            event pending                      queue empty
//!   ┌──────────────────────────┐   ┌──────────────────────────────────┐
//!   ▼                          │   │                                  ▼
//! Pumping ─── queue empty ──► IdleWait ── now - last >= target ──► render + present
//!   ▲                                                                 │
//!   └──────────────────────── next poll ──────────────────────────────┘
//! ```
//!
//! Each [`poll`](FramePacingScheduler::poll) services at most one OS event.
//! Only when the queue is empty does it read the clock; if the target
//! interval has elapsed since the last frame it clears, draws the payload,
//! brackets the present call with two clock reads and hands the resulting
//! [`FrameTimingSample`] to the recorder.
//!
//! There is no catch-up. When the loop was held up for several intervals,
//! the next idle poll renders one frame and restarts the interval from that
//! poll.
//!
//! UI actions (fullscreen toggle, capability report) are handled on the poll
//! that dispatched them, which is never in the middle of a frame.

use thiserror::Error;

use crate::clock::Clock;
use crate::context::PresentationContext;
use crate::event::{EventSource, Pump, UiAction};
use crate::payload::PayloadSource;
use crate::policy::PresentationPolicy;
use crate::probe::CapabilityProbe;
use crate::record::TimingRecorder;
use crate::surface::{PresentError, PresentOutcome, PresentationSurface, SurfaceError};
use crate::time::{Duration, HostTime};
use crate::timing::FrameTimingSample;

/// Configuration for the [`FramePacingScheduler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PacingConfig {
    /// Presentation policy; fixes the arguments of every present.
    pub policy: PresentationPolicy,
    /// Minimum time between the starts of two frames, in nanoseconds.
    pub target_interval_nanos: u64,
}

impl PacingConfig {
    /// The 1 ms (1000 Hz) stress target.
    ///
    /// This is well above any display refresh rate on purpose: with tearing
    /// it finds the present throughput ceiling, with v-sync it shows the
    /// refresh clamp.
    pub const TARGET_INTERVAL_NANOS: u64 = 1_000_000;

    /// Pacing with the given policy at the default target.
    #[must_use]
    pub const fn new(policy: PresentationPolicy) -> Self {
        Self {
            policy,
            target_interval_nanos: Self::TARGET_INTERVAL_NANOS,
        }
    }

    /// Tearing-unlocked preset.
    #[must_use]
    pub const fn tearing() -> Self {
        Self::new(PresentationPolicy::TearingUnlocked)
    }

    /// V-sync-locked preset.
    #[must_use]
    pub const fn vsync() -> Self {
        Self::new(PresentationPolicy::VsyncLocked)
    }

    /// Overrides the target interval.
    #[must_use]
    pub const fn with_target_interval_nanos(mut self, nanos: u64) -> Self {
        self.target_interval_nanos = nanos;
        self
    }
}

/// Which half of the loop the last poll was in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoopState {
    /// Draining OS events.
    Pumping,
    /// Queue empty, polling the clock.
    IdleWait,
}

/// What a single poll did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Poll {
    /// An OS event was dispatched.
    Pumped,
    /// A UI action was dispatched and handled.
    Action(UiAction),
    /// The queue was empty and the next frame is not due yet.
    Idle,
    /// A frame was rendered and presented.
    Frame(FrameTimingSample),
    /// Quit was requested.
    Quit,
}

/// Why the loop stopped early.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LoopError {
    /// A present failed in a way that invalidates the device.
    #[error("frame {frame_index}: {error}")]
    Present {
        /// Frame whose present failed.
        frame_index: u64,
        /// The fatal failure.
        error: PresentError,
    },
    /// The context has no live surface.
    #[error("presentation surface is not available")]
    SurfaceLost,
}

/// The frame-pacing loop.
///
/// See the [module docs](self) for the state machine.
#[derive(Debug)]
pub struct FramePacingScheduler<C> {
    config: PacingConfig,
    clock: C,
    target: Duration,
    state: LoopState,
    last_frame: HostTime,
    frames: u64,
}

impl<C: Clock> FramePacingScheduler<C> {
    /// Creates a scheduler; the first frame is due one interval from now.
    #[must_use]
    pub fn new(config: PacingConfig, clock: C) -> Self {
        let target = Duration::from_nanos(config.target_interval_nanos, clock.timebase());
        let last_frame = clock.now();
        Self {
            config,
            clock,
            target,
            state: LoopState::Pumping,
            last_frame,
            frames: 0,
        }
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &PacingConfig {
        &self.config
    }

    /// The loop clock.
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The state after the last poll.
    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// The target interval in clock ticks.
    #[must_use]
    pub fn target_interval(&self) -> Duration {
        self.target
    }

    /// When the last frame started (or when the scheduler was created).
    #[must_use]
    pub fn last_frame_time(&self) -> HostTime {
        self.last_frame
    }

    /// Number of frames executed so far.
    #[must_use]
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Runs one iteration of the loop.
    ///
    /// Returns an error only for failures that end the loop. The caller is
    /// responsible for cleanup in that case; [`run`](Self::run) does it.
    pub fn poll<S, P, E, L, R>(
        &mut self,
        ctx: &mut PresentationContext<S, P>,
        events: &mut E,
        content: &mut L,
        recorder: &mut R,
    ) -> Result<Poll, LoopError>
    where
        S: PresentationSurface,
        P: CapabilityProbe,
        E: EventSource + ?Sized,
        L: PayloadSource + ?Sized,
        R: TimingRecorder + ?Sized,
    {
        match events.pump() {
            Pump::Quit => Ok(Poll::Quit),
            Pump::Dispatched => {
                self.enter(LoopState::Pumping);
                Ok(Poll::Pumped)
            }
            Pump::Action(action) => {
                self.enter(LoopState::Pumping);
                self.handle_action(action, ctx, events, recorder)?;
                Ok(Poll::Action(action))
            }
            Pump::Empty => {
                self.enter(LoopState::IdleWait);
                let now = self.clock.now();
                if now.saturating_duration_since(self.last_frame) < self.target {
                    self.clock.idle(self.last_frame + self.target);
                    return Ok(Poll::Idle);
                }
                let surface = ctx.surface_mut().ok_or(LoopError::SurfaceLost)?;
                self.render_frame(surface, now, content, recorder)
                    .map(Poll::Frame)
            }
        }
    }

    /// Polls until quit or a fatal error, then releases the surface.
    ///
    /// Returns the number of frames rendered. Cleanup runs on every exit
    /// path.
    pub fn run<S, P, E, L, R>(
        &mut self,
        ctx: &mut PresentationContext<S, P>,
        events: &mut E,
        content: &mut L,
        recorder: &mut R,
    ) -> Result<u64, LoopError>
    where
        S: PresentationSurface,
        P: CapabilityProbe,
        E: EventSource + ?Sized,
        L: PayloadSource + ?Sized,
        R: TimingRecorder + ?Sized,
    {
        let result = loop {
            match self.poll(ctx, events, content, recorder) {
                Ok(Poll::Quit) => break Ok(self.frames),
                Ok(_) => {}
                Err(err) => break Err(err),
            }
        };
        ctx.cleanup();
        result
    }

    fn enter(&mut self, state: LoopState) {
        if self.state != state {
            log::trace!("loop state {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    fn handle_action<S, P, E, R>(
        &mut self,
        action: UiAction,
        ctx: &mut PresentationContext<S, P>,
        events: &mut E,
        recorder: &mut R,
    ) -> Result<(), LoopError>
    where
        S: PresentationSurface,
        P: CapabilityProbe,
        E: EventSource + ?Sized,
        R: TimingRecorder + ?Sized,
    {
        match action {
            UiAction::ToggleFullscreen => match ctx.toggle_fullscreen() {
                Ok(fullscreen) => recorder.on_fullscreen_changed(fullscreen, self.clock.now()),
                Err(SurfaceError::Released) => return Err(LoopError::SurfaceLost),
                Err(err) => log::warn!("fullscreen toggle failed: {err}"),
            },
            UiAction::ReportCapabilities => {
                let result = ctx.probe_capabilities();
                recorder.on_capability_report(&result);
                events.show_capability_report(&result);
            }
        }
        Ok(())
    }

    fn render_frame<S, L, R>(
        &mut self,
        surface: &mut S,
        now: HostTime,
        content: &mut L,
        recorder: &mut R,
    ) -> Result<FrameTimingSample, LoopError>
    where
        S: PresentationSurface,
        L: PayloadSource + ?Sized,
        R: TimingRecorder + ?Sized,
    {
        let frame_index = self.frames;
        let payload = content.payload(frame_index, now, self.clock.timebase());

        match surface.clear(payload.clear_color) {
            Ok(()) => {}
            Err(SurfaceError::Released) => return Err(LoopError::SurfaceLost),
            Err(err) => log::warn!("frame {frame_index}: clear failed: {err}"),
        }
        if let Some(label) = payload.label()
            && let Err(err) = surface.draw_label(&label)
        {
            log::warn!("frame {frame_index}: {err}");
        }

        let request = self.config.policy.present_request();
        let begin = self.clock.now();
        let result = surface.present(request);
        let end = self.clock.now();

        let sample = FrameTimingSample::from_bracket(frame_index, begin, end);
        recorder.on_frame(&sample);
        self.frames += 1;
        self.last_frame = now;

        match result {
            Ok(PresentOutcome::Presented) => {}
            Ok(PresentOutcome::Occluded) => {
                log::debug!("frame {frame_index}: window occluded");
                recorder.on_occluded(frame_index);
            }
            Err(error) => {
                recorder.on_present_error(frame_index, &error);
                if error.is_fatal() {
                    log::error!("frame {frame_index}: {error}; tearing down");
                    return Err(LoopError::Present { frame_index, error });
                }
                log::warn!("frame {frame_index}: {error}");
            }
        }
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::capability::CompositionCapabilityReport;
    use crate::clock::ManualClock;
    use crate::payload::{SolidClear, TimestampLabel};
    use crate::probe::ProbeError;
    use crate::record::NoopRecorder;
    use crate::status::StatusCode;
    use crate::testing::{FixedProbe, MockSurface, ScriptedEvents};

    const MS: u64 = 1_000_000;

    #[derive(Default)]
    struct Collect {
        frames: Vec<FrameTimingSample>,
        fullscreen: Vec<bool>,
        reports: usize,
        errors: Vec<PresentError>,
        occluded: usize,
    }

    impl TimingRecorder for Collect {
        fn on_frame(&mut self, sample: &FrameTimingSample) {
            self.frames.push(*sample);
        }
        fn on_occluded(&mut self, _frame_index: u64) {
            self.occluded += 1;
        }
        fn on_present_error(&mut self, _frame_index: u64, error: &PresentError) {
            self.errors.push(*error);
        }
        fn on_fullscreen_changed(&mut self, fullscreen: bool, _at: HostTime) {
            self.fullscreen.push(fullscreen);
        }
        fn on_capability_report(
            &mut self,
            _result: &Result<CompositionCapabilityReport, ProbeError>,
        ) {
            self.reports += 1;
        }
    }

    fn context<'a>(
        surface: MockSurface<'a>,
    ) -> PresentationContext<MockSurface<'a>, FixedProbe> {
        PresentationContext::new(surface, FixedProbe::supported(0x3))
    }

    #[test]
    fn pending_event_is_serviced_before_the_clock() {
        let clock = ManualClock::new(0);
        let mut sched = FramePacingScheduler::new(PacingConfig::tearing(), &clock);
        let mut ctx = context(MockSurface::new(PresentationPolicy::TearingUnlocked));
        let mut events = ScriptedEvents::new([Pump::Dispatched]);

        clock.advance(Duration(5 * MS));
        let poll = sched.poll(&mut ctx, &mut events, &mut SolidClear([0.0; 4]), &mut NoopRecorder);
        assert_eq!(poll, Ok(Poll::Pumped));
        assert_eq!(sched.state(), LoopState::Pumping);
        assert_eq!(sched.frames_rendered(), 0, "no frame while events pending");

        let poll = sched.poll(&mut ctx, &mut events, &mut SolidClear([0.0; 4]), &mut NoopRecorder);
        assert!(matches!(poll, Ok(Poll::Frame(_))), "{poll:?}");
        assert_eq!(sched.state(), LoopState::IdleWait);
    }

    #[test]
    fn frame_waits_for_target_interval() {
        let clock = ManualClock::new(10 * MS);
        let mut sched = FramePacingScheduler::new(PacingConfig::tearing(), &clock);
        let mut ctx = context(MockSurface::new(PresentationPolicy::TearingUnlocked));
        let mut events = ScriptedEvents::new([]);
        let mut content = SolidClear([0.0; 4]);

        clock.advance(Duration(MS / 2));
        let poll = sched.poll(&mut ctx, &mut events, &mut content, &mut NoopRecorder);
        assert_eq!(poll, Ok(Poll::Idle));
        // ManualClock::idle jumps to the deadline.
        assert_eq!(clock.peek(), HostTime(11 * MS));

        let poll = sched.poll(&mut ctx, &mut events, &mut content, &mut NoopRecorder);
        assert!(matches!(poll, Ok(Poll::Frame(_))), "due exactly at target");
        assert_eq!(sched.last_frame_time(), HostTime(11 * MS));
    }

    #[test]
    fn latency_brackets_present_and_is_non_negative() {
        let clock = ManualClock::new(0);
        let mut sched = FramePacingScheduler::new(PacingConfig::tearing(), &clock);
        let surface =
            MockSurface::new(PresentationPolicy::TearingUnlocked).with_present_cost(&clock, 300);
        let mut ctx = context(surface);
        let mut events = ScriptedEvents::quit_after(20);
        let mut recorder = Collect::default();

        let frames = sched
            .run(&mut ctx, &mut events, &mut SolidClear([0.0; 4]), &mut recorder)
            .unwrap();
        assert!(frames > 0, "some frames rendered");
        assert_eq!(recorder.frames.len() as u64, frames);
        for pair in recorder.frames.windows(2) {
            assert!(pair[1].timestamp >= pair[0].timestamp, "monotonic log");
        }
        for s in &recorder.frames {
            assert_eq!(s.present_latency, Duration(300), "cost of the mock present");
            assert!(s.present_began() <= s.timestamp);
        }
    }

    #[test]
    fn tearing_cadence_tracks_target_interval() {
        let clock = ManualClock::new(0);
        clock.set_step(Duration(50_000));
        let mut sched = FramePacingScheduler::new(PacingConfig::tearing(), &clock);
        let surface =
            MockSurface::new(PresentationPolicy::TearingUnlocked).with_present_cost(&clock, 200_000);
        let mut ctx = context(surface);
        let mut events = ScriptedEvents::quit_after(200);
        let mut recorder = Collect::default();

        sched
            .run(&mut ctx, &mut events, &mut SolidClear([0.0; 4]), &mut recorder)
            .unwrap();
        let starts: Vec<HostTime> = recorder.frames.iter().map(|s| s.present_began()).collect();
        assert!(starts.len() > 10, "enough frames: {}", starts.len());
        for pair in starts.windows(2) {
            let delta = pair[1] - pair[0];
            assert!(delta.ticks() >= MS, "never faster than the target: {delta:?}");
            assert!(delta.ticks() < 2 * MS, "close to the target: {delta:?}");
        }
    }

    #[test]
    fn overrun_renders_one_frame_without_catch_up() {
        let clock = ManualClock::new(0);
        let mut sched = FramePacingScheduler::new(PacingConfig::tearing(), &clock);
        let mut ctx = context(MockSurface::new(PresentationPolicy::TearingUnlocked));
        let mut events = ScriptedEvents::new([]);
        let mut content = SolidClear([0.0; 4]);

        // The loop was held up for ten intervals.
        clock.advance(Duration(10 * MS));
        let first = sched.poll(&mut ctx, &mut events, &mut content, &mut NoopRecorder);
        assert!(matches!(first, Ok(Poll::Frame(_))));
        let second = sched.poll(&mut ctx, &mut events, &mut content, &mut NoopRecorder);
        assert_eq!(second, Ok(Poll::Idle), "backlog is not replayed");
        assert_eq!(sched.last_frame_time(), HostTime(10 * MS));
        assert_eq!(sched.frames_rendered(), 1);
    }

    #[test]
    fn every_present_uses_the_policy_request() {
        for policy in [
            PresentationPolicy::TearingUnlocked,
            PresentationPolicy::VsyncLocked,
        ] {
            let clock = ManualClock::new(0);
            let mut sched = FramePacingScheduler::new(PacingConfig::new(policy), &clock);
            let surface = MockSurface::new(policy);
            let log = surface.present_log();
            let mut ctx = context(surface);
            let mut events = ScriptedEvents::new([
                Pump::Empty,
                Pump::Action(UiAction::ToggleFullscreen),
                Pump::Empty,
            ])
            .then_quit_after(30);

            sched
                .run(&mut ctx, &mut events, &mut TimestampLabel::new(policy.label()), &mut NoopRecorder)
                .unwrap();
            let presents = log.borrow();
            assert!(!presents.is_empty(), "{policy}: presents issued");
            for p in presents.iter() {
                assert_eq!(p.request, policy.present_request(), "{policy}");
                assert_eq!(p.request.allow_tearing, policy.allows_tearing());
            }
        }
    }

    #[test]
    fn fullscreen_toggle_rebuilds_view_before_next_present() {
        let clock = ManualClock::new(0);
        let mut sched = FramePacingScheduler::new(PacingConfig::tearing(), &clock);
        let surface = MockSurface::new(PresentationPolicy::TearingUnlocked);
        let log = surface.present_log();
        let mut ctx = context(surface);
        let mut events = ScriptedEvents::new([
            Pump::Empty,
            Pump::Action(UiAction::ToggleFullscreen),
            Pump::Empty,
        ]);
        let mut recorder = Collect::default();
        let mut content = SolidClear([0.0; 4]);

        for _ in 0..6 {
            clock.advance(Duration(MS));
            sched
                .poll(&mut ctx, &mut events, &mut content, &mut recorder)
                .unwrap();
        }

        assert_eq!(recorder.fullscreen, [true]);
        assert!(ctx.surface().unwrap().is_fullscreen());
        let presents = log.borrow();
        let generations: Vec<u32> = presents.iter().map(|p| p.view_generation).collect();
        assert_eq!(generations.first(), Some(&0), "first frame on initial view");
        assert_eq!(generations.last(), Some(&1), "later frames on rebuilt view");
        assert!(presents.iter().all(|p| p.outcome.is_ok()), "presents succeed");
    }

    #[test]
    fn capability_report_reaches_ui_and_recorder() {
        let clock = ManualClock::new(0);
        let mut sched = FramePacingScheduler::new(PacingConfig::vsync(), &clock);
        let mut ctx = PresentationContext::new(
            MockSurface::new(PresentationPolicy::VsyncLocked),
            FixedProbe::failing(ProbeError::NoOutput(StatusCode(-1))),
        );
        let mut events = ScriptedEvents::new([Pump::Action(UiAction::ReportCapabilities)]);
        let mut recorder = Collect::default();

        let poll = sched.poll(&mut ctx, &mut events, &mut SolidClear([0.0; 4]), &mut recorder);
        assert_eq!(poll, Ok(Poll::Action(UiAction::ReportCapabilities)));
        assert_eq!(recorder.reports, 1);
        assert_eq!(
            events.reports(),
            [Err(ProbeError::NoOutput(StatusCode(-1)))],
            "failure is handed to the UI, loop continues"
        );
        assert!(ctx.surface().is_some(), "probe failure leaves surface alone");
    }

    #[test]
    fn transient_failure_and_occlusion_keep_running() {
        let clock = ManualClock::new(0);
        let mut sched = FramePacingScheduler::new(PacingConfig::tearing(), &clock);
        let surface = MockSurface::new(PresentationPolicy::TearingUnlocked).with_outcomes([
            Err(PresentError::Failed(StatusCode(-2))),
            Ok(PresentOutcome::Occluded),
        ]);
        let mut ctx = context(surface);
        let mut events = ScriptedEvents::quit_after(20);
        let mut recorder = Collect::default();

        let frames = sched
            .run(&mut ctx, &mut events, &mut SolidClear([0.0; 4]), &mut recorder)
            .unwrap();
        assert!(frames > 2, "loop continued past recoverable failures");
        assert_eq!(recorder.errors, [PresentError::Failed(StatusCode(-2))]);
        assert_eq!(recorder.occluded, 1);
    }

    #[test]
    fn device_removal_ends_loop_and_cleans_up() {
        let clock = ManualClock::new(0);
        let mut sched = FramePacingScheduler::new(PacingConfig::tearing(), &clock);
        let removed = PresentError::DeviceRemoved(StatusCode(0x887A_0005_u32 as i32));
        let surface = MockSurface::new(PresentationPolicy::TearingUnlocked)
            .with_outcomes([Ok(PresentOutcome::Presented), Err(removed)]);
        let releases = surface.release_count();
        let mut ctx = context(surface);
        let mut events = ScriptedEvents::quit_after(1_000);
        let mut recorder = Collect::default();

        let err = sched
            .run(&mut ctx, &mut events, &mut SolidClear([0.0; 4]), &mut recorder)
            .unwrap_err();
        assert_eq!(
            err,
            LoopError::Present {
                frame_index: 1,
                error: removed
            }
        );
        assert_eq!(recorder.frames.len(), 2, "failing frame is still sampled");
        assert_eq!(releases.get(), 1, "surface released once");
        assert!(ctx.surface().is_none());
        assert!(!ctx.cleanup(), "second cleanup is a no-op");
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn quit_runs_cleanup_once() {
        let clock = ManualClock::new(0);
        let mut sched = FramePacingScheduler::new(PacingConfig::vsync(), &clock);
        let surface = MockSurface::new(PresentationPolicy::VsyncLocked);
        let releases = surface.release_count();
        let mut ctx = context(surface);
        let mut events = ScriptedEvents::new([Pump::Quit]);

        let frames = sched
            .run(&mut ctx, &mut events, &mut SolidClear([0.0; 4]), &mut NoopRecorder)
            .unwrap();
        assert_eq!(frames, 0);
        assert_eq!(releases.get(), 1);
        drop(ctx);
        assert_eq!(releases.get(), 1, "drop after cleanup does not release again");
    }

    #[test]
    fn missing_surface_is_reported() {
        let clock = ManualClock::new(0);
        let mut sched = FramePacingScheduler::new(PacingConfig::tearing(), &clock);
        let mut ctx: PresentationContext<MockSurface<'_>, FixedProbe> =
            PresentationContext::without_surface(FixedProbe::supported(0));
        let mut events = ScriptedEvents::new([]);

        clock.advance(Duration(2 * MS));
        let poll = sched.poll(&mut ctx, &mut events, &mut SolidClear([0.0; 4]), &mut NoopRecorder);
        assert_eq!(poll, Err(LoopError::SurfaceLost));
        assert!(!ctx.cleanup(), "nothing to release");
    }
}
