// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Driver status codes carried by errors.

use core::fmt;

/// An `HRESULT`-shaped status code reported by the driver or OS.
///
/// Backends convert their native error values into this type so that core
/// errors can carry the underlying code for diagnostic logging.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StatusCode(pub i32);

impl StatusCode {
    /// Returns `true` when the high (severity) bit is set.
    #[inline]
    #[must_use]
    pub const fn is_failure(self) -> bool {
        self.0 < 0
    }

    /// Returns the code as an unsigned 32-bit value, the way `HRESULT`s are
    /// usually written.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0 as u32
    }
}

impl fmt::Debug for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StatusCode({:#010x})", self.as_u32())
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.as_u32())
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;

    use super::StatusCode;

    #[test]
    fn formats_as_hresult_hex() {
        // DXGI_ERROR_NOT_FOUND
        let code = StatusCode(0x887A_0002_u32 as i32);
        assert!(code.is_failure());
        assert_eq!(format!("{code}"), "0x887a0002");
        assert!(!StatusCode(0).is_failure(), "S_OK is not a failure");
    }
}
