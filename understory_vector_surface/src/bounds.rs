// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Size};
use understory_map_view::{GeoPoint, MapView};

/// Axis‑aligned rectangle in layer pixels that a surface is prepared to draw
/// within.
///
/// Always normalized: `min.x <= max.x` and `min.y <= max.y`. Values are
/// replaced on recomputation, never edited.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelBounds {
    min: Point,
    max: Point,
}

impl PixelBounds {
    /// Creates bounds spanning the two corners, in any order.
    #[must_use]
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Top‑left corner.
    #[must_use]
    pub fn min(&self) -> Point {
        self.min
    }

    /// Bottom‑right corner.
    #[must_use]
    pub fn max(&self) -> Point {
        self.max
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Width and height.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Midpoint of the bounds.
    #[must_use]
    pub fn center(&self) -> Point {
        self.min.midpoint(self.max)
    }

    /// The same rectangle as a kurbo [`Rect`].
    #[must_use]
    pub fn to_rect(&self) -> Rect {
        Rect::from_points(self.min, self.max)
    }

    /// Returns `true` if `point` lies inside or on the edge.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Returns `true` if `rect` overlaps these bounds, edges included.
    ///
    /// Shapes use this to skip drawing geometry that lies entirely off the
    /// surface.
    #[must_use]
    pub fn intersects(&self, rect: Rect) -> bool {
        let rect = rect.abs();
        rect.x0 <= self.max.x
            && rect.x1 >= self.min.x
            && rect.y0 <= self.max.y
            && rect.y1 >= self.min.y
    }
}

impl From<PixelBounds> for Rect {
    fn from(bounds: PixelBounds) -> Self {
        bounds.to_rect()
    }
}

/// The view that bounds and transforms are computed relative to.
///
/// Center and zoom are only ever captured together.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewSnapshot {
    center: GeoPoint,
    zoom: f64,
}

impl ViewSnapshot {
    /// Creates a snapshot from an explicit center and zoom.
    #[must_use]
    pub const fn new(center: GeoPoint, zoom: f64) -> Self {
        Self { center, zoom }
    }

    /// Captures the host's current center and zoom.
    #[must_use]
    pub fn capture(view: &(impl MapView + ?Sized)) -> Self {
        Self::new(view.center(), view.zoom())
    }

    /// Geographic center at capture time.
    #[must_use]
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    /// Zoom at capture time.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }
}

/// Computes the padded pixel bounds for the host's current view.
///
/// The viewport rectangle is inflated by `padding × size` on each side, its
/// top‑left converted from container to layer pixels, and both corners rounded
/// to whole pixels.
#[must_use]
pub fn padded_bounds(view: &(impl MapView + ?Sized), padding: f64) -> PixelBounds {
    let size = view.size().to_vec2();
    let min = view
        .container_point_to_layer_point((size * -padding).to_point())
        .round();
    let max = (min + size * (1.0 + 2.0 * padding)).round();
    PixelBounds::new(min, max)
}
