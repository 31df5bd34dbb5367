// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Prints what `CheckHardwareCompositionSupport` reports for adapter 0,
//! output 0.
//!
//! Exits with status 1 when any step of the probe chain fails.

use std::process::ExitCode;

use framepace_backend_windows::composition_probe;
use framepace_core::probe::CapabilityProbe;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match composition_probe().probe() {
        Ok(report) => {
            println!("raw:               {:#x} ({})", report.raw(), report.raw());
            println!("fullscreen:        {}", report.fullscreen());
            println!("windowed:          {}", report.windowed());
            println!("cursor stretched:  {}", report.cursor_stretched());
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("capability probe failed: {err}");
            println!("raw:               -1");
            ExitCode::FAILURE
        }
    }
}
