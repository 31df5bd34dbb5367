// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hardware composition capability report.

use core::fmt;

bitflags::bitflags! {
    /// Hardware composition modes supported by an output.
    ///
    /// Bit values match `DXGI_HARDWARE_COMPOSITION_SUPPORT_FLAGS`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CompositionCapabilities: u32 {
        /// Composition of fullscreen swap chains.
        const FULLSCREEN = 0x1;
        /// Composition of windowed swap chains.
        const WINDOWED = 0x2;
        /// Hardware cursor stretching.
        const CURSOR_STRETCHED = 0x4;
    }
}

/// The immutable result of a successful capability probe.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompositionCapabilityReport {
    raw: u32,
    flags: CompositionCapabilities,
}

impl CompositionCapabilityReport {
    /// Builds a report from the raw bitmask returned by the driver.
    ///
    /// Unknown bits are kept in [`raw`](Self::raw) for display but never
    /// show up in [`flags`](Self::flags).
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            flags: CompositionCapabilities::from_bits_truncate(raw),
        }
    }

    /// The integer bitmask exactly as the driver reported it.
    #[must_use]
    pub const fn raw(&self) -> u32 {
        self.raw
    }

    /// The recognized capability flags.
    #[must_use]
    pub const fn flags(&self) -> CompositionCapabilities {
        self.flags
    }

    /// Fullscreen composition is supported.
    #[must_use]
    pub const fn fullscreen(&self) -> bool {
        self.flags.contains(CompositionCapabilities::FULLSCREEN)
    }

    /// Windowed composition is supported.
    #[must_use]
    pub const fn windowed(&self) -> bool {
        self.flags.contains(CompositionCapabilities::WINDOWED)
    }

    /// Cursor stretching is supported.
    #[must_use]
    pub const fn cursor_stretched(&self) -> bool {
        self.flags.contains(CompositionCapabilities::CURSOR_STRETCHED)
    }
}

impl fmt::Debug for CompositionCapabilityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositionCapabilityReport")
            .field("raw", &self.raw)
            .field("fullscreen", &self.fullscreen())
            .field("windowed", &self.windowed())
            .field("cursor_stretched", &self.cursor_stretched())
            .finish()
    }
}

impl fmt::Display for CompositionCapabilityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (fullscreen={} windowed={} cursor-stretched={})",
            self.raw,
            self.fullscreen(),
            self.windowed(),
            self.cursor_stretched(),
        )
    }
}
