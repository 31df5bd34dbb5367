// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runs the 1 kHz loop against a v-sync locked swap chain, so the log shows
//! presents clamped to the display refresh. Logs to `render_vsync_log.txt`.

use std::process::ExitCode;

use framepace_core::payload::TimestampLabel;
use framepace_core::policy::PresentationPolicy;
use windows_pacing_common::DemoConfig;

fn main() -> ExitCode {
    let mut content = TimestampLabel::new(PresentationPolicy::VsyncLocked.label());
    windows_pacing_common::run(&DemoConfig::vsync(), &mut content)
}
