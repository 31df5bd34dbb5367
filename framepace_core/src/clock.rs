// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clock abstraction for the busy-polled frame loop.
//!
//! The scheduler never sleeps: it reads [`Clock::now`] on every idle poll and
//! calls [`Clock::idle`] when the next frame is not due yet. The default
//! `idle` only issues a spin-loop hint. A platform with a sub-millisecond
//! wait primitive can override it, as long as it returns promptly enough for
//! pending OS events to be serviced.

use core::cell::Cell;

use crate::time::{Duration, HostTime, Timebase};

/// A monotonic clock read by the frame loop.
pub trait Clock {
    /// Returns the current monotonic time.
    fn now(&self) -> HostTime;

    /// Returns the conversion factor from this clock's ticks to nanoseconds.
    fn timebase(&self) -> Timebase;

    /// Called when the loop is idle and the next frame is due at `deadline`.
    fn idle(&self, deadline: HostTime) {
        _ = deadline;
        core::hint::spin_loop();
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> HostTime {
        (**self).now()
    }

    fn timebase(&self) -> Timebase {
        (**self).timebase()
    }

    fn idle(&self, deadline: HostTime) {
        (**self).idle(deadline);
    }
}

/// A nanosecond clock advanced explicitly by the caller.
///
/// Every [`now`](Clock::now) read advances the clock by the configured
/// per-read step, which models the passage of time between polls without
/// any real waiting. [`idle`](Clock::idle) jumps straight to the deadline.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
    step: Cell<u64>,
}

impl ManualClock {
    /// Creates a clock starting at `start` nanoseconds with no per-read step.
    #[must_use]
    pub fn new(start: u64) -> Self {
        Self {
            now: Cell::new(start),
            step: Cell::new(0),
        }
    }

    /// Sets how far every subsequent read advances the clock.
    pub fn set_step(&self, step: Duration) {
        self.step.set(step.ticks());
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get().saturating_add(by.ticks()));
    }

    /// Returns the current time without advancing.
    #[must_use]
    pub fn peek(&self) -> HostTime {
        HostTime(self.now.get())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> HostTime {
        let t = self.now.get();
        self.now.set(t.saturating_add(self.step.get()));
        HostTime(t)
    }

    fn timebase(&self) -> Timebase {
        Timebase::NANOS
    }

    fn idle(&self, deadline: HostTime) {
        if deadline.ticks() > self.now.get() {
            self.now.set(deadline.ticks());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_are_monotonic_with_step() {
        let clock = ManualClock::new(100);
        clock.set_step(Duration(10));
        let a = clock.now();
        let b = clock.now();
        assert_eq!(a, HostTime(100));
        assert_eq!(b, HostTime(110));
    }

    #[test]
    fn idle_jumps_to_deadline_but_never_backwards() {
        let clock = ManualClock::new(1_000);
        clock.idle(HostTime(5_000));
        assert_eq!(clock.peek(), HostTime(5_000));
        clock.idle(HostTime(2_000));
        assert_eq!(clock.peek(), HostTime(5_000), "idle must not rewind");
    }

    #[test]
    fn reference_forwards_to_clock() {
        let clock = ManualClock::new(7);
        let by_ref = &clock;
        assert_eq!(by_ref.now(), HostTime(7));
        assert_eq!(by_ref.timebase(), Timebase::NANOS);
    }
}
