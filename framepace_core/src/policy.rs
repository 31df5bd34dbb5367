// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presentation policies.
//!
//! A [`PresentationPolicy`] is chosen once at startup and fixes three things
//! for the lifetime of the surface:
//!
//! | Policy | Buffers | Refresh hint | Allow-tearing chain flag | Sync interval | Present flag |
//! |---|---|---|---|---|---|
//! | [`TearingUnlocked`](PresentationPolicy::TearingUnlocked) | 5 | 1000/1 | set | 0 | allow tearing |
//! | [`VsyncLocked`](PresentationPolicy::VsyncLocked) | 2 | none | clear | 1 | none |
//!
//! The swap-chain side (buffer count, hint, creation flag) and the present
//! side ([`PresentRequest`]) are negotiated together with the output, so they
//! are always derived from the same policy value.

use core::fmt;

/// How presents are paced against the display's vertical blank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PresentationPolicy {
    /// Present immediately with tearing allowed; not paced by the display.
    TearingUnlocked,
    /// Present on the next vertical blank.
    VsyncLocked,
}

impl PresentationPolicy {
    /// Number of swap-chain buffers.
    ///
    /// The deeper queue for tearing keeps unpaced presents from stalling on
    /// buffer availability.
    #[must_use]
    pub const fn buffer_count(self) -> u32 {
        match self {
            Self::TearingUnlocked => 5,
            Self::VsyncLocked => 2,
        }
    }

    /// Sync interval passed to every present.
    #[must_use]
    pub const fn sync_interval(self) -> u32 {
        match self {
            Self::TearingUnlocked => 0,
            Self::VsyncLocked => 1,
        }
    }

    /// Whether the swap chain is created with tearing support and presents
    /// carry the allow-tearing flag.
    #[must_use]
    pub const fn allows_tearing(self) -> bool {
        matches!(self, Self::TearingUnlocked)
    }

    /// Refresh-rate hint set in the swap-chain mode description.
    #[must_use]
    pub const fn refresh_hint(self) -> Option<RefreshRate> {
        match self {
            Self::TearingUnlocked => Some(RefreshRate::new(1000, 1)),
            Self::VsyncLocked => None,
        }
    }

    /// The present arguments every frame under this policy uses.
    #[must_use]
    pub const fn present_request(self) -> PresentRequest {
        PresentRequest {
            sync_interval: self.sync_interval(),
            allow_tearing: self.allows_tearing(),
        }
    }

    /// Short name used in window titles and payload labels.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TearingUnlocked => "Tearing",
            Self::VsyncLocked => "VSync",
        }
    }

    /// Timing log file name for this policy.
    #[must_use]
    pub const fn log_file_name(self) -> &'static str {
        match self {
            Self::TearingUnlocked => "render_tearing_log.txt",
            Self::VsyncLocked => "render_vsync_log.txt",
        }
    }
}

impl fmt::Display for PresentationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A refresh rate expressed as a rational number of hertz.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RefreshRate {
    /// Numerator.
    pub numerator: u32,
    /// Denominator.
    pub denominator: u32,
}

impl RefreshRate {
    /// Creates a refresh rate of `numerator / denominator` Hz.
    #[must_use]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }
}

/// Arguments of a single present call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PresentRequest {
    /// Number of vertical blanks to wait; 0 presents immediately.
    pub sync_interval: u32,
    /// Whether the allow-tearing present flag is set.
    pub allow_tearing: bool,
}

impl PresentRequest {
    /// Returns `true` if this request can legally be issued on a swap chain
    /// created for `policy`.
    ///
    /// The tearing flag is only valid with a zero interval on a chain created
    /// with tearing support; a v-sync chain must never see it.
    #[must_use]
    pub const fn is_valid_for(self, policy: PresentationPolicy) -> bool {
        if self.allow_tearing {
            policy.allows_tearing() && self.sync_interval == 0
        } else {
            !policy.allows_tearing() && self.sync_interval >= 1
        }
    }
}
