// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Vec2};
use understory_map_view::{GeoPoint, MapView};

use crate::bounds::{PixelBounds, ViewSnapshot};

/// Placement of a whole drawing surface: a top‑left position in layer pixels
/// plus a uniform scale about that corner.
///
/// Applying it to content rendered for the snapshot's view approximates the
/// target view without touching any shape geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceTransform {
    /// Where the surface's top‑left corner goes, in layer pixels.
    pub origin: Point,
    /// Uniform scale applied about `origin`.
    pub scale: f64,
}

impl SurfaceTransform {
    /// A transform that places the surface at `origin` without scaling.
    #[must_use]
    pub const fn at(origin: Point) -> Self {
        Self { origin, scale: 1.0 }
    }

    /// Displacement from the surface's resting placement at `bounds.min()`.
    ///
    /// Zero when the transform describes the view the bounds were computed
    /// for.
    #[must_use]
    pub fn translation(&self, bounds: &PixelBounds) -> Vec2 {
        self.origin - bounds.min()
    }

    /// Returns `true` if this transform leaves a surface resting at `bounds`
    /// where it is, within `tolerance` pixels.
    #[must_use]
    pub fn is_identity_for(&self, bounds: &PixelBounds, tolerance: f64) -> bool {
        let t = self.translation(bounds);
        t.x.abs() <= tolerance
            && t.y.abs() <= tolerance
            && (self.scale - 1.0).abs() <= f64::EPSILON
    }

    /// The same placement with the scale dropped.
    ///
    /// Used for surfaces that can only be positioned.
    #[must_use]
    pub const fn without_scale(self) -> Self {
        Self::at(self.origin)
    }

    /// Maps surface‑local pixels (origin at the surface's top‑left corner) to
    /// layer pixels.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.origin.to_vec2()) * Affine::scale(self.scale)
    }
}

/// Computes the surface transform that maps content rendered for `snapshot`
/// onto the view at `target_center`/`target_zoom`.
///
/// The scale comes from the host's zoom law. The origin is the padded
/// half‑viewport, scaled, around where the snapshot's center lands at the
/// target zoom, expressed relative to the pixel origin the host would adopt for
/// the target view.
#[must_use]
pub fn compute_transform(
    view: &(impl MapView + ?Sized),
    snapshot: &ViewSnapshot,
    padding: f64,
    target_center: GeoPoint,
    target_zoom: f64,
) -> SurfaceTransform {
    let scale = view.zoom_scale(target_zoom, snapshot.zoom());
    let view_half = view.size().to_vec2() * (0.5 + padding);
    let center_px = view.project(snapshot.center(), target_zoom);
    let new_origin = view.new_pixel_origin(target_center, target_zoom);
    let origin = center_px - view_half * scale - new_origin.to_vec2();
    SurfaceTransform { origin, scale }
}
