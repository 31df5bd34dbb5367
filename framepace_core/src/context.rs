// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The single owner of every presentation resource.
//!
//! [`PresentationContext`] holds the one live surface and the capability
//! probe. The scheduler, the UI actions and the final cleanup all go through
//! it by reference, so there is never more than one surface and its lifetime
//! is explicit.

use crate::capability::CompositionCapabilityReport;
use crate::probe::{CapabilityProbe, ProbeError};
use crate::surface::{PresentationSurface, SurfaceError};

/// Owns the presentation surface and the capability probe.
#[derive(Debug)]
pub struct PresentationContext<S: PresentationSurface, P> {
    surface: Option<S>,
    probe: P,
}

impl<S: PresentationSurface, P: CapabilityProbe> PresentationContext<S, P> {
    /// Takes ownership of a freshly created surface.
    #[must_use]
    pub const fn new(surface: S, probe: P) -> Self {
        Self {
            surface: Some(surface),
            probe,
        }
    }

    /// A context whose surface was never created, for example because
    /// startup failed half way. Cleanup on it is a no-op.
    #[must_use]
    pub const fn without_surface(probe: P) -> Self {
        Self {
            surface: None,
            probe,
        }
    }

    /// The live surface, if it has not been released.
    #[must_use]
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Mutable access to the live surface.
    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    /// Flips exclusive fullscreen. Returns the new state.
    ///
    /// Only call between frames; the scheduler guarantees no present is in
    /// flight when it handles UI actions.
    pub fn toggle_fullscreen(&mut self) -> Result<bool, SurfaceError> {
        let surface = self.surface.as_mut().ok_or(SurfaceError::Released)?;
        let target = !surface.is_fullscreen();
        surface.set_fullscreen(target)?;
        log::info!("fullscreen {}", if target { "entered" } else { "left" });
        Ok(target)
    }

    /// Runs the capability probe once.
    ///
    /// Failures are returned to the caller and never affect the surface.
    pub fn probe_capabilities(&self) -> Result<CompositionCapabilityReport, ProbeError> {
        let result = self.probe.probe();
        match &result {
            Ok(report) => log::info!("hardware composition support: {report}"),
            Err(err) => log::warn!("capability probe failed: {err}"),
        }
        result
    }

    /// Releases the surface if it is still live.
    ///
    /// Returns `true` if this call released it. Safe to call any number of
    /// times and on a context that never had a surface.
    pub fn cleanup(&mut self) -> bool {
        match self.surface.take() {
            Some(mut surface) => {
                surface.release();
                true
            }
            None => false,
        }
    }
}

impl<S: PresentationSurface, P> Drop for PresentationContext<S, P> {
    fn drop(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PresentationPolicy;
    use crate::testing::{FixedProbe, MockSurface};

    #[test]
    fn toggle_starts_from_live_fullscreen_state() {
        let surface = MockSurface::new(PresentationPolicy::TearingUnlocked);
        let state = surface.fullscreen_state();
        let mut ctx = PresentationContext::new(surface, FixedProbe::supported(0));

        assert_eq!(ctx.toggle_fullscreen(), Ok(true));
        // Alt+Tab drops exclusive fullscreen without going through the loop.
        state.set(false);
        assert_eq!(
            ctx.toggle_fullscreen(),
            Ok(true),
            "toggle must re-enter fullscreen, not leave it again"
        );
        assert!(state.get(), "surface ends up fullscreen");
    }

    #[test]
    fn cleanup_is_idempotent() {
        let surface = MockSurface::new(PresentationPolicy::VsyncLocked);
        let releases = surface.release_count();
        let mut ctx = PresentationContext::new(surface, FixedProbe::supported(0));

        assert!(ctx.cleanup(), "first cleanup releases");
        assert!(!ctx.cleanup(), "second cleanup is a no-op");
        drop(ctx);
        assert_eq!(releases.get(), 1, "released exactly once");
    }
}
