// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for vector surface integration tests.

#![allow(
    missing_docs,
    reason = "Integration-test helper module; not part of the public API."
)]
#![allow(
    dead_code,
    reason = "Each test binary uses a different subset of the helpers."
)]

use core::fmt;
use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Size, Vec2};
use understory_map_view::{EventHub, GeoPoint, MapView, Subscription, ViewEvent, ViewEventKinds};
use understory_vector_surface::{
    DrawSurface, MemberShape, PixelBounds, ShapeContext, ShapeId, ShapeRegistry, SurfaceTransform,
};

/// Everything the backend and the shapes were asked to do, in order.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    Acquire,
    Release,
    Bounds(PixelBounds),
    Transform(SurfaceTransform),
    Reset(usize),
    Project(usize),
    Update(usize),
}

pub(crate) type Log = Rc<RefCell<Vec<Call>>>;

pub(crate) fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AcquireFailed;

impl fmt::Display for AcquireFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("drawable unavailable")
    }
}

impl core::error::Error for AcquireFailed {}

/// Backend that records its calls into a shared [`Log`].
#[derive(Debug)]
pub(crate) struct RecordingBackend {
    pub(crate) log: Log,
    pub(crate) fail_acquire: bool,
    pub(crate) scalable: bool,
}

impl RecordingBackend {
    pub(crate) fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            fail_acquire: false,
            scalable: true,
        }
    }

    pub(crate) fn translate_only(log: &Log) -> Self {
        Self {
            scalable: false,
            ..Self::new(log)
        }
    }

    pub(crate) fn failing(log: &Log) -> Self {
        Self {
            fail_acquire: true,
            ..Self::new(log)
        }
    }
}

impl DrawSurface for RecordingBackend {
    type Error = AcquireFailed;

    fn acquire(&mut self) -> Result<(), AcquireFailed> {
        if self.fail_acquire {
            return Err(AcquireFailed);
        }
        self.log.borrow_mut().push(Call::Acquire);
        Ok(())
    }

    fn release(&mut self) {
        self.log.borrow_mut().push(Call::Release);
    }

    fn set_bounds(&mut self, bounds: PixelBounds) {
        self.log.borrow_mut().push(Call::Bounds(bounds));
    }

    fn set_transform(&mut self, transform: SurfaceTransform) {
        self.log.borrow_mut().push(Call::Transform(transform));
    }

    fn supports_scale(&self) -> bool {
        self.scalable
    }
}

/// Shape that records its notifications, tagged with `tag`.
///
/// `on_first_project` and `on_first_update` each run once, after the matching
/// call is logged, and may touch the registry.
pub(crate) struct RecordingShape {
    pub(crate) tag: usize,
    pub(crate) log: Log,
    pub(crate) on_first_project: Option<Box<dyn FnOnce()>>,
    pub(crate) on_first_update: Option<Box<dyn FnOnce()>>,
}

impl RecordingShape {
    pub(crate) fn new(tag: usize, log: &Log) -> Self {
        Self {
            tag,
            log: log.clone(),
            on_first_project: None,
            on_first_update: None,
        }
    }

    pub(crate) fn shared(tag: usize, log: &Log) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new(tag, log)))
    }
}

impl MemberShape for RecordingShape {
    fn reset(&mut self, _cx: &ShapeContext<'_>) {
        self.log.borrow_mut().push(Call::Reset(self.tag));
    }

    fn project(&mut self, _cx: &ShapeContext<'_>) {
        self.log.borrow_mut().push(Call::Project(self.tag));
        if let Some(hook) = self.on_first_project.take() {
            hook();
        }
    }

    fn update(&mut self, _cx: &ShapeContext<'_>) {
        self.log.borrow_mut().push(Call::Update(self.tag));
        if let Some(hook) = self.on_first_update.take() {
            hook();
        }
    }
}

/// Registers `count` recording shapes tagged `0..count`.
pub(crate) fn register_many(registry: &ShapeRegistry, log: &Log, count: usize) -> Vec<ShapeId> {
    (0..count)
        .map(|tag| registry.register(RecordingShape::shared(tag, log)))
        .collect()
}

/// Only the shape calls from `log`, in order.
pub(crate) fn shape_calls(log: &Log) -> Vec<Call> {
    log.borrow()
        .iter()
        .filter(|call| {
            matches!(
                call,
                Call::Reset(_) | Call::Project(_) | Call::Update(_)
            )
        })
        .cloned()
        .collect()
}

/// Plate carrée host whose scale grows linearly between whole zoom levels.
///
/// Whole levels still double, but zoom 5.5 is 1.5× zoom 5 rather than √2×.
#[derive(Debug)]
pub(crate) struct LinearView {
    center: GeoPoint,
    zoom: f64,
    size: Size,
    pane_offset: Vec2,
    pixel_origin: Point,
    zoom_animated: bool,
    hub: EventHub,
}

impl LinearView {
    pub(crate) fn new(center: GeoPoint, zoom: f64, size: Size) -> Self {
        let mut view = Self {
            center,
            zoom,
            size,
            pane_offset: Vec2::ZERO,
            pixel_origin: Point::ZERO,
            zoom_animated: true,
            hub: EventHub::new(),
        };
        view.pixel_origin = view.new_pixel_origin(center, zoom);
        view
    }

    pub(crate) fn hub(&self) -> &EventHub {
        &self.hub
    }

    pub(crate) fn set_zoom_animated(&mut self, animated: bool) {
        self.zoom_animated = animated;
    }

    fn world_size(zoom: f64) -> f64 {
        let whole = zoom.floor();
        256.0 * 2.0_f64.powf(whole) * (1.0 + (zoom - whole))
    }

    pub(crate) fn unproject(&self, point: Point, zoom: f64) -> GeoPoint {
        let world = Self::world_size(zoom);
        GeoPoint::new(90.0 - point.y / world * 180.0, point.x / world * 360.0 - 180.0)
    }

    pub(crate) fn pan_by(&mut self, offset: Vec2) -> ViewEvent {
        let center_px = self.project(self.center, self.zoom) + offset;
        self.center = self.unproject(center_px, self.zoom);
        self.pane_offset -= offset;
        ViewEvent::MoveEnd
    }

    pub(crate) fn finish_zoom(&mut self, zoom: f64) -> [ViewEvent; 3] {
        self.zoom = zoom;
        self.pixel_origin = self.new_pixel_origin(self.center, zoom);
        [ViewEvent::Zoom, ViewEvent::ZoomEnd, ViewEvent::MoveEnd]
    }
}

impl MapView for LinearView {
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
        Self::world_size(to_zoom) / Self::world_size(from_zoom)
    }

    fn project(&self, point: GeoPoint, zoom: f64) -> Point {
        let world = Self::world_size(zoom);
        Point::new(
            (point.lng + 180.0) / 360.0 * world,
            (90.0 - point.lat) / 180.0 * world,
        )
    }

    fn container_point_to_layer_point(&self, point: Point) -> Point {
        point - self.pane_offset
    }

    fn new_pixel_origin(&self, center: GeoPoint, zoom: f64) -> Point {
        (self.project(center, zoom) - self.size.to_vec2() / 2.0 + self.pane_offset).round()
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
