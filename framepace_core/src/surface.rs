// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presentation surface contract.
//!
//! A backend implements [`PresentationSurface`] over its swap chain and
//! render target. The scheduler drives it once per frame:
//!
//! ```rust,ignore
//! surface.clear(payload.clear_color)?;
//! if let Some(label) = &payload.label {
//!     surface.draw_label(&label.text, label.rect)?;
//! }
//! let begin = clock.now();
//! let outcome = surface.present(policy.present_request());
//! let end = clock.now();
//! ```
//!
//! The surface is not a clock: callers take timestamps around
//! [`present`](PresentationSurface::present) themselves.
//!
//! # Lifecycle
//!
//! A surface is built from a validated [`SurfaceConfig`]. Its render target
//! view becomes invalid whenever the back buffers change shape, so
//! [`set_fullscreen`](PresentationSurface::set_fullscreen) must rebuild it
//! before returning. [`release`](PresentationSurface::release) tears the
//! surface down in a fixed order (render target view, device context,
//! device, swap chain with fullscreen forced off first) and must be safe to
//! call any number of times.

use kurbo::Rect;
use thiserror::Error;

use crate::policy::{PresentRequest, PresentationPolicy, RefreshRate};
use crate::status::StatusCode;

/// An RGBA clear color with components in `0.0..=1.0`.
pub type Rgba = [f32; 4];

/// Opaque black.
pub const BLACK: Rgba = [0.0, 0.0, 0.0, 1.0];

/// Swap-chain parameters derived from a [`PresentationPolicy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceConfig {
    /// Back-buffer width in pixels.
    pub width: u32,
    /// Back-buffer height in pixels.
    pub height: u32,
    /// The policy this surface is created for.
    pub policy: PresentationPolicy,
    /// Number of swap-chain buffers.
    pub buffer_count: u32,
    /// Refresh-rate hint written into the mode description, if any.
    pub refresh_hint: Option<RefreshRate>,
    /// Whether the chain is created with tearing support.
    pub allow_tearing: bool,
    /// The present arguments every frame will use.
    pub present: PresentRequest,
}

impl SurfaceConfig {
    /// Derives every swap-chain parameter from `policy`.
    #[must_use]
    pub const fn new(width: u32, height: u32, policy: PresentationPolicy) -> Self {
        Self {
            width,
            height,
            policy,
            buffer_count: policy.buffer_count(),
            refresh_hint: policy.refresh_hint(),
            allow_tearing: policy.allows_tearing(),
            present: policy.present_request(),
        }
    }

    /// Checks that the creation-time and present-time halves agree.
    ///
    /// Backends call this before creating anything, so that a tearing
    /// present paired with a v-sync chain (or the reverse) fails at creation
    /// instead of on the first present.
    pub fn validate(&self) -> Result<(), SurfaceError> {
        if self.width == 0 || self.height == 0 {
            return Err(SurfaceError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        if self.buffer_count != self.policy.buffer_count() {
            return Err(SurfaceError::BufferCount {
                policy: self.policy,
                buffer_count: self.buffer_count,
            });
        }
        if self.allow_tearing != self.policy.allows_tearing()
            || !self.present.is_valid_for(self.policy)
        {
            return Err(SurfaceError::PolicyMismatch {
                policy: self.policy,
                request: self.present,
            });
        }
        Ok(())
    }
}

/// Non-error result of a present call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PresentOutcome {
    /// The frame was queued for display.
    Presented,
    /// The window is not visible; nothing was shown. Not fatal.
    Occluded,
}

/// A failed present call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PresentError {
    /// The device was removed. Every handle is invalid.
    #[error("device removed ({0})")]
    DeviceRemoved(StatusCode),
    /// The device was reset. Every handle is invalid.
    #[error("device reset ({0})")]
    DeviceReset(StatusCode),
    /// The present failed for a transient reason.
    #[error("present failed ({0})")]
    Failed(StatusCode),
    /// The request does not match the policy the chain was created for.
    #[error("present request {request:?} violates the {policy} policy")]
    PolicyViolation {
        /// The chain's policy.
        policy: PresentationPolicy,
        /// The rejected request.
        request: PresentRequest,
    },
    /// The surface has already been released.
    #[error("surface already released")]
    Released,
}

impl PresentError {
    /// Whether the whole surface must be torn down.
    ///
    /// Fatal failures are never retried in place.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::DeviceRemoved(_) | Self::DeviceReset(_) | Self::Released
        )
    }
}

/// A failure creating or reconfiguring a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The requested back-buffer size is empty.
    #[error("invalid surface size {width}x{height}")]
    InvalidSize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// The creation flags and present flags disagree.
    #[error("present request {request:?} does not match a {policy} swap chain")]
    PolicyMismatch {
        /// The chain's policy.
        policy: PresentationPolicy,
        /// The conflicting present request.
        request: PresentRequest,
    },
    /// The buffer count differs from the one the policy fixes.
    #[error("{buffer_count} buffers do not match a {policy} swap chain")]
    BufferCount {
        /// The chain's policy.
        policy: PresentationPolicy,
        /// The requested buffer count.
        buffer_count: u32,
    },
    /// The OS or driver cannot present with tearing.
    #[error("tearing presents are not supported on this system")]
    TearingUnsupported,
    /// A creation step failed.
    #[error("failed to create {stage} ({code})")]
    Creation {
        /// What was being created.
        stage: &'static str,
        /// Underlying status.
        code: StatusCode,
    },
    /// The fullscreen transition was refused.
    #[error("fullscreen transition failed ({0})")]
    Fullscreen(StatusCode),
    /// Drawing the frame payload failed.
    #[error("drawing frame payload failed ({0})")]
    Draw(StatusCode),
    /// The surface has already been released.
    #[error("surface already released")]
    Released,
}

/// A text label drawn over the cleared frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Label<'a> {
    /// The text.
    pub text: &'a str,
    /// Layout box in window pixels; text is centered in it.
    pub rect: Rect,
}

/// A swap chain plus its current render target.
pub trait PresentationSurface {
    /// The policy the surface was created for.
    fn policy(&self) -> PresentationPolicy;

    /// Binds the current render target view and clears it.
    fn clear(&mut self, color: Rgba) -> Result<(), SurfaceError>;

    /// Draws the frame payload label over the cleared target.
    fn draw_label(&mut self, label: &Label<'_>) -> Result<(), SurfaceError>;

    /// Presents the back buffer.
    ///
    /// Implementations reject a request that is not
    /// [valid](PresentRequest::is_valid_for) for their policy with
    /// [`PresentError::PolicyViolation`] without touching the swap chain.
    fn present(&mut self, request: PresentRequest) -> Result<PresentOutcome, PresentError>;

    /// Whether the surface is currently in exclusive fullscreen.
    fn is_fullscreen(&self) -> bool;

    /// Enters or leaves exclusive fullscreen and rebuilds the render target
    /// view for the new back buffers.
    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), SurfaceError>;

    /// Releases every resource in teardown order. Idempotent.
    fn release(&mut self);
}
