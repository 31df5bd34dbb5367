// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A 200×200 borderless window cleared to a new random color every frame.
//!
//! Left double-click toggles exclusive fullscreen. Present costs go to
//! `render_log.txt`.

use std::process::ExitCode;

use framepace_core::payload::{FramePayload, PayloadSource};
use framepace_core::time::{HostTime, Timebase};
use rand::Rng;
use windows_pacing_common::DemoConfig;

/// Clears to a random opaque color.
struct RandomClear<R>(R);

impl<R: Rng> PayloadSource for RandomClear<R> {
    fn payload(&mut self, _frame_index: u64, _now: HostTime, _timebase: Timebase) -> FramePayload {
        FramePayload {
            clear_color: [
                self.0.gen_range(0.0..=1.0),
                self.0.gen_range(0.0..=1.0),
                self.0.gen_range(0.0..=1.0),
                1.0,
            ],
            label: None,
        }
    }
}

fn main() -> ExitCode {
    let mut content = RandomClear(rand::thread_rng());
    windows_pacing_common::run(&DemoConfig::minimal(), &mut content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn colors_are_opaque_and_in_range() {
        let mut source = RandomClear(StdRng::seed_from_u64(7));
        for i in 0..100 {
            let payload = source.payload(i, HostTime(i), Timebase::NANOS);
            let [r, g, b, a] = payload.clear_color;
            assert_eq!(a, 1.0, "alpha is fixed");
            for c in [r, g, b] {
                assert!((0.0..=1.0).contains(&c), "component {c} out of range");
            }
            assert!(payload.label.is_none(), "no text in the minimal variant");
        }
    }
}
