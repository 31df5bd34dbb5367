// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated frame loop that exercises the timing log and trace pipeline.
//!
//! Runs the real [`FramePacingScheduler`] under both presentation policies
//! against a [`ManualClock`], a simulated swap chain and a scripted event
//! queue. Each run appends to `sim_<policy>_log.txt`, prints every event
//! through a [`PrettyPrintSink`] and exports `sim_<policy>_trace.json` for
//! `chrome://tracing` or Perfetto.
//!
//! The simulated swap chain costs a fixed 250 µs per unlocked present and
//! blocks to the next 60 Hz boundary per v-sync present, so the two logs
//! show the same contrast the Windows demos are built to measure.

use std::collections::VecDeque;
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;

use framepace_core::capability::{CompositionCapabilities, CompositionCapabilityReport};
use framepace_core::clock::{Clock, ManualClock};
use framepace_core::context::PresentationContext;
use framepace_core::event::{EventSource, Pump, UiAction};
use framepace_core::payload::TimestampLabel;
use framepace_core::policy::{PresentRequest, PresentationPolicy};
use framepace_core::probe::{CapabilityProbe, ProbeError};
use framepace_core::record::Fanout;
use framepace_core::scheduler::{FramePacingScheduler, PacingConfig};
use framepace_core::surface::{
    Label, PresentError, PresentOutcome, PresentationSurface, Rgba, SurfaceError,
};
use framepace_core::time::{Duration, HostTime};

use framepace_debug::pretty::PrettyPrintSink;
use framepace_debug::recorder::RecorderSink;
use framepace_debug::timing_log::TimingLogSink;

const MS: u64 = 1_000_000;
/// Cost of an unlocked present.
const TEARING_PRESENT_NS: u64 = 250_000;
/// 60 Hz refresh interval in nanoseconds.
const REFRESH_INTERVAL_NS: u64 = 16_666_667;
/// Simulated run length.
const RUN_NS: u64 = 100 * MS;
/// Start at 1 s so the labels are not all zero.
const START_NS: u64 = 1_000_000_000;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    for policy in [
        PresentationPolicy::TearingUnlocked,
        PresentationPolicy::VsyncLocked,
    ] {
        simulate(policy)?;
    }
    Ok(())
}

fn simulate(policy: PresentationPolicy) -> Result<(), Box<dyn Error>> {
    let name = policy.label().to_ascii_lowercase();
    let log_path = format!("sim_{name}_log.txt");
    let trace_path = format!("sim_{name}_trace.json");

    let clock = ManualClock::new(START_NS);
    let timebase = clock.timebase();

    // -- sinks -------------------------------------------------------------
    let log = TimingLogSink::append(&log_path, timebase)?;
    let pretty = PrettyPrintSink::with_writer(std::io::stdout(), timebase);
    let mut sinks = Fanout::new(log, Fanout::new(pretty, RecorderSink::new()));

    // -- collaborators -----------------------------------------------------
    let mut ctx = PresentationContext::new(SimSurface::new(policy, &clock), SimProbe);
    let at = |offset_ms: u64| START_NS + offset_ms * MS;
    let mut events = SimEvents::new(
        &clock,
        [
            (at(10), Pump::Dispatched),
            (at(20), Pump::Action(UiAction::ReportCapabilities)),
            (at(40), Pump::Action(UiAction::ToggleFullscreen)),
            (at(60), Pump::Action(UiAction::ToggleFullscreen)),
        ],
        START_NS + RUN_NS,
    );
    let mut content = TimestampLabel::new(policy.label());

    // -- loop --------------------------------------------------------------
    let mut scheduler = FramePacingScheduler::new(PacingConfig::new(policy), &clock);
    let frames = scheduler.run(&mut ctx, &mut events, &mut content, &mut sinks)?;

    let Fanout {
        first: mut log,
        second: Fanout {
            second: recorder, ..
        },
    } = sinks;
    log.flush()?;

    let file = File::create(&trace_path)?;
    let mut writer = BufWriter::new(file);
    framepace_debug::chrome::export(recorder.events(), timebase, &mut writer)?;

    log::info!(
        "{policy}: {frames} frames in {} ms, appended to {log_path}, trace in {trace_path}",
        RUN_NS / MS
    );
    Ok(())
}

/// A swap chain whose presents take simulated time.
#[derive(Debug)]
struct SimSurface<'a> {
    policy: PresentationPolicy,
    clock: &'a ManualClock,
    fullscreen: bool,
    released: bool,
}

impl<'a> SimSurface<'a> {
    fn new(policy: PresentationPolicy, clock: &'a ManualClock) -> Self {
        Self {
            policy,
            clock,
            fullscreen: false,
            released: false,
        }
    }

    /// Windowed v-sync presents from 80 ms on are hidden behind another
    /// window.
    fn occluded(&self) -> bool {
        !self.fullscreen && self.clock.peek().ticks() >= START_NS + 80 * MS
    }
}

impl PresentationSurface for SimSurface<'_> {
    fn policy(&self) -> PresentationPolicy {
        self.policy
    }

    fn clear(&mut self, _color: Rgba) -> Result<(), SurfaceError> {
        if self.released {
            return Err(SurfaceError::Released);
        }
        Ok(())
    }

    fn draw_label(&mut self, _label: &Label<'_>) -> Result<(), SurfaceError> {
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
        let now = self.clock.peek().ticks();
        let cost = if request.sync_interval == 0 {
            TEARING_PRESENT_NS
        } else {
            REFRESH_INTERVAL_NS - now % REFRESH_INTERVAL_NS
        };
        self.clock.advance(Duration(cost));
        if self.policy == PresentationPolicy::VsyncLocked && self.occluded() {
            return Ok(PresentOutcome::Occluded);
        }
        Ok(PresentOutcome::Presented)
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), SurfaceError> {
        if self.released {
            return Err(SurfaceError::Released);
        }
        // A mode switch costs a couple of frames.
        self.clock.advance(Duration(2 * REFRESH_INTERVAL_NS));
        self.fullscreen = fullscreen;
        Ok(())
    }

    fn release(&mut self) {
        if !self.released {
            log::debug!("simulated surface released");
            self.released = true;
        }
    }
}

/// Reports windowed and fullscreen composition support.
#[derive(Clone, Copy, Debug)]
struct SimProbe;

impl CapabilityProbe for SimProbe {
    fn probe(&self) -> Result<CompositionCapabilityReport, ProbeError> {
        let flags = CompositionCapabilities::FULLSCREEN | CompositionCapabilities::WINDOWED;
        Ok(CompositionCapabilityReport::from_raw(flags.bits()))
    }
}

/// Delivers scripted events once the clock reaches them, then quits.
#[derive(Debug)]
struct SimEvents<'a> {
    clock: &'a ManualClock,
    script: VecDeque<(u64, Pump)>,
    quit_at: u64,
}

impl<'a> SimEvents<'a> {
    fn new(
        clock: &'a ManualClock,
        script: impl IntoIterator<Item = (u64, Pump)>,
        quit_at: u64,
    ) -> Self {
        Self {
            clock,
            script: script.into_iter().collect(),
            quit_at,
        }
    }
}

impl EventSource for SimEvents<'_> {
    fn pump(&mut self) -> Pump {
        let now = self.clock.peek();
        if now >= HostTime(self.quit_at) {
            return Pump::Quit;
        }
        match self.script.front() {
            Some(&(due, pump)) if now >= HostTime(due) => {
                self.script.pop_front();
                pump
            }
            _ => Pump::Empty,
        }
    }

    fn show_capability_report(&mut self, result: &Result<CompositionCapabilityReport, ProbeError>) {
        let raw = result.as_ref().map_or(-1, |report| i64::from(report.raw()));
        println!("[ui] CheckHWComposeSupport: {raw}");
    }
}

#[cfg(test)]
mod tests {
    use framepace_core::record::NoopRecorder;

    use super::*;

    #[test]
    fn vsync_presents_land_on_refresh_boundaries() {
        let clock = ManualClock::new(START_NS);
        let mut surface = SimSurface::new(PresentationPolicy::VsyncLocked, &clock);
        let request = PresentationPolicy::VsyncLocked.present_request();
        for _ in 0..3 {
            surface.present(request).unwrap();
            assert_eq!(
                clock.peek().ticks() % REFRESH_INTERVAL_NS,
                0,
                "present returned off the refresh grid"
            );
        }
    }

    #[test]
    fn tearing_run_is_paced_at_one_millisecond() {
        let clock = ManualClock::new(START_NS);
        let policy = PresentationPolicy::TearingUnlocked;
        let mut ctx = PresentationContext::new(SimSurface::new(policy, &clock), SimProbe);
        let mut events = SimEvents::new(&clock, [], START_NS + 20 * MS);
        let mut content = TimestampLabel::new(policy.label());
        let mut recorder = RecorderSink::new();
        let mut scheduler = FramePacingScheduler::new(PacingConfig::new(policy), &clock);

        let frames = scheduler
            .run(&mut ctx, &mut events, &mut content, &mut recorder)
            .unwrap();

        assert!((19..=20).contains(&frames), "{frames} frames in 20 ms");
        let stamps: Vec<u64> = recorder.frames().map(|s| s.timestamp.ticks()).collect();
        assert!(
            stamps.windows(2).all(|w| w[1] - w[0] == MS),
            "unlocked presents follow the 1 ms target"
        );
        assert!(ctx.surface().is_none(), "run releases the surface");
    }

    #[test]
    fn vsync_run_is_clamped_to_refresh() {
        let clock = ManualClock::new(START_NS);
        let policy = PresentationPolicy::VsyncLocked;
        let mut ctx = PresentationContext::new(SimSurface::new(policy, &clock), SimProbe);
        let mut events = SimEvents::new(&clock, [], START_NS + 50 * MS);
        let mut content = TimestampLabel::new(policy.label());
        let mut scheduler = FramePacingScheduler::new(PacingConfig::new(policy), &clock);

        let frames = scheduler
            .run(&mut ctx, &mut events, &mut content, &mut NoopRecorder)
            .unwrap();

        assert!(frames <= 4, "{frames} frames in 50 ms at 60 Hz");
    }
}
