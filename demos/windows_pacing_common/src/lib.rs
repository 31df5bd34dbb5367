// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared startup and frame-loop wiring for the Windows pacing demos.
//!
//! Each demo binary picks a [`DemoConfig`] preset and a payload and calls
//! [`run`]. Startup happens in a fixed order (window, timing log file,
//! presentation surface); any failure is logged and turns into a failing
//! exit code without entering the loop.

use std::io;
use std::process::ExitCode;

use framepace_backend_windows::{
    ActionBindings, D3D11Surface, DxgiProbe, QpcClock, Window, WindowConfig, WindowError,
    WindowStyle, composition_probe,
};
use framepace_core::clock::Clock;
use framepace_core::context::PresentationContext;
use framepace_core::event::UiAction;
use framepace_core::payload::PayloadSource;
use framepace_core::policy::PresentationPolicy;
use framepace_core::scheduler::{FramePacingScheduler, LoopError, PacingConfig};
use framepace_core::surface::{SurfaceConfig, SurfaceError};
use framepace_debug::timing_log::TimingLogSink;
use thiserror::Error;

/// Window, surface, pacing and log file of one demo binary.
#[derive(Clone, Copy, Debug)]
pub struct DemoConfig {
    /// Window placement, style and double-click bindings.
    pub window: WindowConfig,
    /// Swap-chain parameters.
    pub surface: SurfaceConfig,
    /// Frame-loop pacing.
    pub pacing: PacingConfig,
    /// Timing log path, relative to the working directory.
    pub log_file: &'static str,
}

/// Size of the pacing windows.
const PACING_SIZE: (u32, u32) = (700, 400);

const REPORT_ON_RIGHT_CLICK: ActionBindings = ActionBindings {
    left_double_click: None,
    right_double_click: Some(UiAction::ReportCapabilities),
};

impl DemoConfig {
    /// Overlapped window at the top-left corner, unlocked presents.
    #[must_use]
    pub const fn tearing() -> Self {
        Self::pacing("Render1000-Tearing", 0, PresentationPolicy::TearingUnlocked)
    }

    /// Overlapped window below the tearing one, v-sync presents.
    #[must_use]
    pub const fn vsync() -> Self {
        Self::pacing("Render1000-VSync", 500, PresentationPolicy::VsyncLocked)
    }

    /// Small borderless window with unlocked presents; left double-click
    /// toggles fullscreen.
    #[must_use]
    pub const fn minimal() -> Self {
        let policy = PresentationPolicy::TearingUnlocked;
        Self {
            window: WindowConfig {
                class_name: "Render1000",
                x: 0,
                y: 0,
                width: 200,
                height: 200,
                style: WindowStyle::Popup,
                bindings: ActionBindings {
                    left_double_click: Some(UiAction::ToggleFullscreen),
                    right_double_click: Some(UiAction::ReportCapabilities),
                },
            },
            surface: SurfaceConfig::new(200, 200, policy),
            pacing: PacingConfig::new(policy),
            log_file: "render_log.txt",
        }
    }

    const fn pacing(class_name: &'static str, y: i32, policy: PresentationPolicy) -> Self {
        let (width, height) = PACING_SIZE;
        Self {
            window: WindowConfig {
                class_name,
                x: 0,
                y,
                width,
                height,
                style: WindowStyle::Overlapped,
                bindings: REPORT_ON_RIGHT_CLICK,
            },
            surface: SurfaceConfig::new(width, height, policy),
            pacing: PacingConfig::new(policy),
            log_file: policy.log_file_name(),
        }
    }
}

/// A failure before the frame loop starts.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The window could not be created.
    #[error(transparent)]
    Window(#[from] WindowError),
    /// The timing log could not be opened.
    #[error("cannot open timing log {path}: {source}")]
    Log {
        /// Path that was opened.
        path: &'static str,
        /// The I/O error.
        #[source]
        source: io::Error,
    },
    /// Device or swap-chain creation failed.
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// A failure that ended the demo.
#[derive(Debug, Error)]
pub enum DemoError {
    /// Startup failed; the loop never ran.
    #[error("startup failed: {0}")]
    Startup(#[from] StartupError),
    /// The loop stopped on a fatal error.
    #[error("frame loop stopped: {0}")]
    Loop(#[from] LoopError),
}

/// Installs `env_logger`, filtered by `RUST_LOG` and defaulting to `info`.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Runs a demo to completion and maps the outcome to an exit code.
pub fn run<L: PayloadSource>(config: &DemoConfig, content: &mut L) -> ExitCode {
    init_logging();
    match run_loop(config, content) {
        Ok(frames) => {
            log::info!("exited after {frames} frames");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Starts up, runs the loop until quit, and flushes the timing log.
///
/// Returns the number of frames rendered.
pub fn run_loop<L: PayloadSource>(config: &DemoConfig, content: &mut L) -> Result<u64, DemoError> {
    // Declaration order matters: the context (and with it the swap chain)
    // drops before the window it targets.
    let mut window = Window::create(&config.window).map_err(StartupError::from)?;
    let clock = QpcClock::new();
    let mut log = TimingLogSink::append(config.log_file, clock.timebase()).map_err(|source| {
        StartupError::Log {
            path: config.log_file,
            source,
        }
    })?;
    let surface = D3D11Surface::create(window.hwnd(), config.surface).map_err(StartupError::from)?;
    let mut ctx: PresentationContext<D3D11Surface, DxgiProbe> =
        PresentationContext::new(surface, composition_probe());

    log::info!(
        "{} loop started, target interval {} ns, logging to {}",
        config.pacing.policy,
        config.pacing.target_interval_nanos,
        config.log_file
    );
    let mut scheduler = FramePacingScheduler::new(config.pacing, clock);
    let result = scheduler.run(&mut ctx, &mut window, content, &mut log);

    if let Err(err) = log.flush() {
        log::warn!("timing log incomplete after {} lines: {err}", log.lines_written());
    }
    Ok(result?)
}
