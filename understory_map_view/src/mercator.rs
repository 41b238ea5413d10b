// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::f64::consts::{E, PI};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Size, Vec2};
use smallvec::{SmallVec, smallvec};

use crate::events::{ViewEvent, ViewEventKinds};
use crate::geo::GeoPoint;
use crate::subscription::{EventHub, Subscription};
use crate::view::MapView;

/// Edge length of one tile in pixels; the whole world is one tile at zoom 0.
pub const TILE_SIZE: f64 = 256.0;

/// Sphere radius used by the spherical‑Mercator projection, in meters.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude limit of the square Mercator world, in degrees.
pub const MAX_LATITUDE: f64 = 85.051_128_779_8;

/// Notifications produced by one host operation, in delivery order.
pub type ViewEvents = SmallVec<[ViewEvent; 4]>;

/// Reference map viewport using spherical Mercator and 256‑pixel tiles.
///
/// `MercatorView` owns the view state (center, zoom, container size), the
/// map‑pane offset accumulated by panning, and the pixel origin of the layer
/// coordinate space. Operations that change the view return the
/// notifications a real host would raise, in order; the caller delivers them
/// to its layers.
#[derive(Clone, Debug)]
pub struct MercatorView {
    center: GeoPoint,
    zoom: f64,
    size: Size,
    pane_offset: Vec2,
    pixel_origin: Point,
    min_zoom: f64,
    max_zoom: f64,
    zoom_animated: bool,
    hub: EventHub,
}

impl MercatorView {
    /// Creates a view centered on `center` at `zoom` over a `size` container.
    ///
    /// - Zoom is clamped to the range `[0, 24]` by default.
    /// - The map pane starts at offset zero.
    /// - Zoom animation is enabled.
    #[must_use]
    pub fn new(center: GeoPoint, zoom: f64, size: Size) -> Self {
        let mut view = Self {
            center,
            zoom: 0.0,
            size,
            pane_offset: Vec2::ZERO,
            pixel_origin: Point::ZERO,
            min_zoom: 0.0,
            max_zoom: 24.0,
            zoom_animated: true,
            hub: EventHub::new(),
        };
        view.zoom = view.clamp_zoom(zoom);
        view.pixel_origin = view.new_pixel_origin(center, view.zoom);
        view
    }

    /// Returns the hub that holds this view's subscriptions.
    #[must_use]
    pub fn hub(&self) -> &EventHub {
        &self.hub
    }

    /// Returns the offset of the map pane relative to the container.
    #[must_use]
    pub fn pane_offset(&self) -> Vec2 {
        self.pane_offset
    }

    /// Enables or disables frame‑by‑frame zoom animation.
    pub fn set_zoom_animated(&mut self, animated: bool) {
        self.zoom_animated = animated;
    }

    /// Sets the minimum and maximum zoom levels.
    ///
    /// The range is normalized so that `min_zoom <= max_zoom`. The current zoom
    /// is not changed; limits apply to subsequent view changes.
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        let (min_zoom, max_zoom) = if min_zoom <= max_zoom {
            (min_zoom, max_zoom)
        } else {
            (max_zoom, min_zoom)
        };
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
    }

    /// Pixel scale of the whole world at `zoom`.
    #[must_use]
    pub fn scale(zoom: f64) -> f64 {
        TILE_SIZE * 2.0_f64.powf(zoom)
    }

    /// Converts absolute pixels at `zoom` back to a geographic point.
    #[must_use]
    pub fn unproject(&self, point: Point, zoom: f64) -> GeoPoint {
        let scale = Self::scale(zoom);
        let k = 0.5 / (PI * EARTH_RADIUS);
        let x = (point.x / scale - 0.5) / k;
        let y = (point.y / scale - 0.5) / -k;
        let d = 180.0 / PI;
        GeoPoint::new(
            // 2·atan(e^(y/R)) − π/2
            (2.0 * E.powf(y / EARTH_RADIUS).atan2(1.0) - PI / 2.0) * d,
            x * d / EARTH_RADIUS,
        )
    }

    /// Changes the container size, keeping the center fixed.
    pub fn set_size(&mut self, size: Size) -> ViewEvents {
        if self.size == size {
            return SmallVec::new();
        }
        // Keep the center under the container's middle by shifting the pane.
        let delta = (size.to_vec2() - self.size.to_vec2()) / 2.0;
        self.size = size;
        self.pane_offset += delta;
        smallvec![ViewEvent::MoveEnd]
    }

    /// Jumps to `center` at `zoom` without animation.
    ///
    /// The map pane is reset and the pixel origin re‑derived, so every layer
    /// has to re‑project. Emits `ViewReset`, then `Zoom`/`ZoomEnd` if the zoom
    /// changed, then `MoveEnd`.
    pub fn set_view(&mut self, center: GeoPoint, zoom: f64) -> ViewEvents {
        let zoom = self.clamp_zoom(zoom);
        let zoom_changed = zoom != self.zoom;

        self.center = center;
        self.zoom = zoom;
        self.pane_offset = Vec2::ZERO;
        self.pixel_origin = self.new_pixel_origin(center, zoom);

        let mut events: ViewEvents = smallvec![ViewEvent::ViewReset];
        if zoom_changed {
            events.push(ViewEvent::Zoom);
            events.push(ViewEvent::ZoomEnd);
        }
        events.push(ViewEvent::MoveEnd);
        events
    }

    /// Pans the view by `offset` container pixels.
    ///
    /// Only the map pane moves; the pixel origin stays put.
    pub fn pan_by(&mut self, offset: Vec2) -> ViewEvents {
        if offset == Vec2::ZERO {
            return SmallVec::new();
        }
        let center_px = self.project(self.center, self.zoom) + offset;
        self.center = self.unproject(center_px, self.zoom);
        self.pane_offset -= offset;
        smallvec![ViewEvent::MoveEnd]
    }

    /// Produces one frame of an animated zoom towards `center` at `zoom`.
    ///
    /// The view state does not change until [`finish_zoom`](Self::finish_zoom).
    /// Returns `None` when zoom animation is disabled.
    #[must_use]
    pub fn zoom_frame(&self, center: GeoPoint, zoom: f64) -> Option<ViewEvent> {
        self.zoom_animated.then(|| ViewEvent::ZoomAnim {
            center,
            zoom: self.clamp_zoom(zoom),
        })
    }

    /// Settles a zoom gesture on `center` at `zoom`.
    ///
    /// Emits `Zoom`, `ZoomEnd` and `MoveEnd`.
    pub fn finish_zoom(&mut self, center: GeoPoint, zoom: f64) -> ViewEvents {
        self.zoom = self.clamp_zoom(zoom);
        self.center = center;
        self.pixel_origin = self.new_pixel_origin(center, self.zoom);
        smallvec![ViewEvent::Zoom, ViewEvent::ZoomEnd, ViewEvent::MoveEnd]
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

impl MapView for MercatorView {
    fn center(&self) -> GeoPoint {
        self.center
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn size(&self) -> Size {
        self.size
    }

    fn zoom_scale(&self, to_zoom: f64, from_zoom: f64) -> f64 {
        Self::scale(to_zoom) / Self::scale(from_zoom)
    }

    fn project(&self, point: GeoPoint, zoom: f64) -> Point {
        let d = PI / 180.0;
        let lat = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        let sin = (lat * d).sin();
        let x = EARTH_RADIUS * point.lng * d;
        let y = EARTH_RADIUS * ((1.0 + sin) / (1.0 - sin)).ln() / 2.0;

        let scale = Self::scale(zoom);
        let k = 0.5 / (PI * EARTH_RADIUS);
        Point::new(scale * (k * x + 0.5), scale * (-k * y + 0.5))
    }

    fn container_point_to_layer_point(&self, point: Point) -> Point {
        point - self.pane_offset
    }

    fn new_pixel_origin(&self, center: GeoPoint, zoom: f64) -> Point {
        let half = self.size.to_vec2() / 2.0;
        (self.project(center, zoom) - half + self.pane_offset).round()
    }

    fn pixel_origin(&self) -> Point {
        self.pixel_origin
    }

    fn zoom_animated(&self) -> bool {
        self.zoom_animated
    }

    fn subscribe(&self, interest: ViewEventKinds) -> Subscription {
        self.hub.subscribe(interest)
    }
}
