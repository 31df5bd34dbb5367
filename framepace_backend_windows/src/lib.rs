// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Windows backend for framepace.
//!
//! This crate provides the platform pieces the frame loop in
//! `framepace_core` plugs together:
//!
//! - [`QpcClock`]: `QueryPerformanceCounter` loop clock
//! - [`D3D11Surface`]: Direct3D 11 flip-model swap chain implementing
//!   [`PresentationSurface`](framepace_core::surface::PresentationSurface),
//!   with a Direct2D/DirectWrite text overlay for frame labels
//! - [`composition_probe`]: DXGI hardware composition capability probe
//!   (adapter 0, output 0, `IDXGIOutput6`)
//! - [`Window`]: Win32 window whose message pump is the loop's
//!   [`EventSource`](framepace_core::event::EventSource)

#![expect(
    unsafe_code,
    reason = "Windows backend requires Win32 and COM FFI"
)]

mod overlay;
mod probe;
mod surface;
mod time;
mod window;

pub use probe::{
    DxgiAdapter, DxgiCompositionQuery, DxgiFactory, DxgiFactorySource, DxgiOutput, DxgiProbe,
    composition_probe,
};
pub use surface::D3D11Surface;
pub use time::QpcClock;
pub use window::{ActionBindings, Window, WindowConfig, WindowError, WindowStyle};

use framepace_core::status::StatusCode;
use framepace_core::time::{HostTime, Timebase};

/// Returns the current host time from the performance counter.
#[must_use]
pub fn now() -> HostTime {
    time::now()
}

/// Returns the performance counter [`Timebase`].
#[must_use]
pub fn timebase() -> Timebase {
    time::timebase()
}

/// Carries a Windows error into the platform-neutral status code.
pub(crate) fn status(err: &windows_core::Error) -> StatusCode {
    StatusCode(err.code().0)
}
