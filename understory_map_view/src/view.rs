// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Size};

use crate::events::ViewEventKinds;
use crate::geo::GeoPoint;
use crate::subscription::Subscription;

/// The contract a map viewport offers to layers drawn over it.
///
/// Pixel coordinates come in three flavours:
/// - **absolute** pixels, as returned by [`project`](Self::project): the
///   projected world at a given zoom, origin at the world's top‑left;
/// - **container** pixels, relative to the top‑left of the visible map area;
/// - **layer** pixels, relative to the host's current pixel origin. Layers
///   position their content in layer pixels so that panning only moves a
///   single pane.
///
/// The trait is object safe so layers can hold a `&dyn MapView`.
pub trait MapView {
    /// Current geographic center.
    fn center(&self) -> GeoPoint;

    /// Current zoom level.
    fn zoom(&self) -> f64;

    /// Size of the visible map area in pixels.
    fn size(&self) -> Size;

    /// Ratio of pixel scales between `to_zoom` and `from_zoom`.
    ///
    /// For the usual tiled projection this is `2^(to_zoom - from_zoom)`, but
    /// hosts with other zoom curves return their own law.
    fn zoom_scale(&self, to_zoom: f64, from_zoom: f64) -> f64;

    /// Projects a geographic point to absolute pixels at `zoom`.
    fn project(&self, point: GeoPoint, zoom: f64) -> Point;

    /// Converts a container‑relative point to layer pixels.
    fn container_point_to_layer_point(&self, point: Point) -> Point;

    /// The absolute pixel origin the host would adopt for a view centered on
    /// `center` at `zoom`.
    fn new_pixel_origin(&self, center: GeoPoint, zoom: f64) -> Point;

    /// The absolute pixel origin of the current layer coordinate space.
    fn pixel_origin(&self) -> Point;

    /// Whether the host animates zoom gestures frame by frame.
    ///
    /// Hosts that jump between zoom levels return `false`; layers then ignore
    /// [`ViewEvent::ZoomAnim`](crate::ViewEvent::ZoomAnim).
    fn zoom_animated(&self) -> bool {
        true
    }

    /// Subscribes to the notification kinds in `interest`.
    ///
    /// The subscription lasts as long as the returned guard.
    fn subscribe(&self, interest: ViewEventKinds) -> Subscription;

    /// Projects a geographic point into layer pixels at the current zoom.
    fn layer_point(&self, point: GeoPoint) -> Point {
        let absolute = self.project(point, self.zoom());
        (absolute - self.pixel_origin()).to_point()
    }
}
