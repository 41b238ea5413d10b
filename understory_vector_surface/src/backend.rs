// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::bounds::PixelBounds;
use crate::transform::SurfaceTransform;

/// The drawable a concrete backend (SVG element, canvas, GPU texture, ...)
/// exposes to a [`VectorSurface`](crate::VectorSurface).
///
/// The surface calls these in a fixed order within one notification: bounds
/// first, then the transform, then member shapes draw.
pub trait DrawSurface {
    /// Error raised when the drawable cannot be created.
    type Error: core::error::Error;

    /// Creates or attaches the drawable. Called once per attach.
    fn acquire(&mut self) -> Result<(), Self::Error>;

    /// Destroys or detaches the drawable. Called once per detach.
    fn release(&mut self);

    /// The surface now covers `bounds`; resize and reposition accordingly.
    ///
    /// Content drawn before this call is stale.
    fn set_bounds(&mut self, bounds: PixelBounds);

    /// Places the whole drawable with `transform`.
    ///
    /// Each call replaces the previous placement.
    fn set_transform(&mut self, transform: SurfaceTransform);

    /// Whether the drawable can be scaled as a whole.
    ///
    /// When `false`, [`set_transform`](Self::set_transform) only ever receives
    /// unscaled transforms and zoom frames merely reposition the drawable.
    fn supports_scale(&self) -> bool {
        true
    }
}
