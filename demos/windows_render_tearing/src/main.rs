// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paces presents at 1 kHz with tearing allowed and logs each present's cost
//! to `render_tearing_log.txt`.
//!
//! Right double-click shows the hardware composition support of the primary
//! output.

use std::process::ExitCode;

use framepace_core::payload::TimestampLabel;
use framepace_core::policy::PresentationPolicy;
use windows_pacing_common::DemoConfig;

fn main() -> ExitCode {
    let mut content = TimestampLabel::new(PresentationPolicy::TearingUnlocked.label());
    windows_pacing_common::run(&DemoConfig::tearing(), &mut content)
}
