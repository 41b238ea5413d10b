// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Vector Surface: keep a vector drawing surface in sync with a map
//! viewport.
//!
//! A map overlay that draws many shapes onto one drawable (an SVG element, a
//! canvas, a GPU texture) must answer three questions every time the map moves:
//!
//! - **Where** may it draw? [`padded_bounds`] inflates the viewport by a
//!   padding fraction so short pans do not reveal blank edges.
//! - **How** does stale content follow a zoom gesture? [`compute_transform`]
//!   scales and translates the whole drawable, using the host's zoom law, so
//!   content keeps tracking the map without redrawing.
//! - **When** must shapes redraw? [`VectorSurface`] reacts to
//!   [`ViewEvent`](understory_map_view::ViewEvent)s and calls `reset`,
//!   `project` and `update` on its [`MemberShape`]s only when a transform is
//!   no longer enough.
//!
//! Drawing itself is left to a backend implementing [`DrawSurface`].
//!
//! ## Minimal example
//!
//! ```rust
//! use core::convert::Infallible;
//! use kurbo::{Size, Vec2};
//! use understory_map_view::{GeoPoint, MapView, MercatorView};
//! use understory_vector_surface::{
//!     DrawSurface, PixelBounds, SurfaceEvent, SurfaceTransform, VectorSurface,
//! };
//!
//! #[derive(Default)]
//! struct Canvas {
//!     transform: Option<SurfaceTransform>,
//! }
//!
//! impl DrawSurface for Canvas {
//!     type Error = Infallible;
//!     fn acquire(&mut self) -> Result<(), Infallible> { Ok(()) }
//!     fn release(&mut self) {}
//!     fn set_bounds(&mut self, _bounds: PixelBounds) {}
//!     fn set_transform(&mut self, transform: SurfaceTransform) {
//!         self.transform = Some(transform);
//!     }
//! }
//!
//! let mut view = MercatorView::new(GeoPoint::new(0.0, 0.0), 5.0, Size::new(800.0, 600.0));
//! let mut surface = VectorSurface::new(Canvas::default());
//! surface.attach(&view).unwrap();
//!
//! // 10% padding on each side.
//! let bounds = surface.bounds().unwrap();
//! assert_eq!((bounds.width(), bounds.height()), (960.0, 720.0));
//!
//! // A zoom animation frame only moves the drawable.
//! let frame = view.zoom_frame(view.center(), 6.0).unwrap();
//! match surface.handle_event(&view, frame) {
//!     Some(SurfaceEvent::Transformed(t)) => assert!((t.scale - 2.0).abs() < 1e-12),
//!     other => panic!("unexpected {other:?}"),
//! }
//!
//! // Once a pan settles, bounds follow the view and the transform rests again.
//! for event in view.pan_by(Vec2::new(100.0, 0.0)) {
//!     surface.handle_event(&view, event);
//! }
//! let bounds = surface.bounds().unwrap();
//! assert!(surface.transform().unwrap().is_identity_for(&bounds, 1e-6));
//!
//! surface.detach();
//! assert!(view.hub().is_empty());
//! ```
//!
//! ## Design notes
//!
//! - Single‑threaded. Shapes are shared as `Rc<RefCell<dyn MemberShape>>` and
//!   may register or unregister shapes through a cloned [`ShapeRegistry`] while
//!   being notified.
//! - Panics from shapes propagate; the surface does not catch them.
//! - Diagnostics go through `tracing` at `debug` (lifecycle, bounds) and
//!   `trace` (per‑frame transforms, shape fan‑out). No subscriber is installed.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod backend;
mod bounds;
mod options;
mod shape;
mod surface;
mod transform;

pub use backend::DrawSurface;
pub use bounds::{PixelBounds, ViewSnapshot, padded_bounds};
pub use options::{DEFAULT_PADDING, InvalidPadding, SurfaceOptions};
pub use shape::{MemberShape, ShapeContext, ShapeId, ShapeRegistry, SharedShape};
pub use surface::{AttachError, SurfaceEvent, SurfacePhase, VectorSurface};
pub use transform::{SurfaceTransform, compute_transform};
