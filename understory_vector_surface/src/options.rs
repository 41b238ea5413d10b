// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// Padding used when none is configured: 10% of the viewport on every side.
pub const DEFAULT_PADDING: f64 = 0.1;

/// Configuration of a [`VectorSurface`](crate::VectorSurface).
///
/// Fixed for the lifetime of the surface it is passed to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceOptions {
    padding: f64,
}

impl SurfaceOptions {
    /// Options with [`DEFAULT_PADDING`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            padding: DEFAULT_PADDING,
        }
    }

    /// Sets how far beyond the viewport the surface extends, as a fraction of
    /// the viewport size per side.
    ///
    /// `0.5` extends half a viewport in each direction, doubling the drawn
    /// area's width and height. Rejects negative, NaN and infinite values.
    pub fn with_padding(self, padding: f64) -> Result<Self, InvalidPadding> {
        if padding.is_finite() && padding >= 0.0 {
            Ok(Self { padding })
        } else {
            Err(InvalidPadding { padding })
        }
    }

    /// The configured padding factor.
    #[must_use]
    pub const fn padding(&self) -> f64 {
        self.padding
    }
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Error returned for a padding that is not a finite, non‑negative number.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InvalidPadding {
    /// The rejected value.
    pub padding: f64,
}

impl fmt::Display for InvalidPadding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "padding must be a finite number >= 0, got {}",
            self.padding
        )
    }
}

impl core::error::Error for InvalidPadding {}
