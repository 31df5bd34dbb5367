// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Performance counter host clock.

use framepace_core::clock::Clock;
use framepace_core::time::{HostTime, Timebase};
use windows::Win32::System::Performance::{QueryPerformanceCounter, QueryPerformanceFrequency};

/// Returns the performance counter timebase (ticks → nanoseconds).
///
/// Falls back to [`Timebase::NANOS`] if the frequency cannot be read or
/// reduced, which does not happen on supported Windows versions.
pub(crate) fn timebase() -> Timebase {
    let mut hz = 0_i64;
    // SAFETY: passing a valid pointer to a local.
    if unsafe { QueryPerformanceFrequency(&mut hz) }.is_err() {
        return Timebase::NANOS;
    }
    u64::try_from(hz)
        .ok()
        .and_then(Timebase::from_frequency)
        .unwrap_or(Timebase::NANOS)
}

/// Returns the current performance counter value as a [`HostTime`].
pub(crate) fn now() -> HostTime {
    let mut ticks = 0_i64;
    // SAFETY: passing a valid pointer to a local. The call cannot fail on
    // Windows XP and later.
    let _ = unsafe { QueryPerformanceCounter(&mut ticks) };
    HostTime(u64::try_from(ticks).unwrap_or(0))
}

/// The frame loop clock on Windows.
///
/// Busy-polls: [`idle`](Clock::idle) keeps the default spin-loop hint so
/// pending window messages are serviced on the very next poll.
#[derive(Clone, Copy, Debug)]
pub struct QpcClock {
    timebase: Timebase,
}

impl QpcClock {
    /// Reads the counter frequency once.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timebase: timebase(),
        }
    }
}

impl Default for QpcClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for QpcClock {
    fn now(&self) -> HostTime {
        now()
    }

    fn timebase(&self) -> Timebase {
        self.timebase
    }
}
