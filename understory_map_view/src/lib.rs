// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Map View: the host viewport contract for map overlays.
//!
//! This crate describes the small surface a map viewport exposes to the layers
//! drawn on top of it. It focuses on:
//! - Geographic ↔ pixel projection at an arbitrary zoom ([`MapView::project`]).
//! - The zoom-to-scale law ([`MapView::zoom_scale`]) so layers never hard‑code
//!   "doubling per zoom level".
//! - Container ↔ layer pixel conversion and pixel‑origin bookkeeping.
//! - View notifications ([`ViewEvent`]) and owned, scoped subscriptions
//!   ([`Subscription`]).
//!
//! It does **not** render anything. [`MercatorView`] is a reference host that
//! implements the contract with the standard spherical‑Mercator projection and
//! 256‑pixel tiles; real hosts can implement [`MapView`] on their own state.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size, Vec2};
//! use understory_map_view::{GeoPoint, MapView, MercatorView, ViewEvent, ViewEventKinds};
//!
//! let mut view = MercatorView::new(GeoPoint::new(0.0, 0.0), 5.0, Size::new(800.0, 600.0));
//!
//! // A layer subscribes and keeps the guard for as long as it is attached.
//! let subscription = view.subscribe(ViewEventKinds::MOVE_END | ViewEventKinds::ZOOM_END);
//! assert_eq!(view.hub().len(), 1);
//!
//! // The map centre projects to the middle of the container.
//! assert_eq!(view.layer_point(view.center()), Point::new(400.0, 300.0));
//!
//! // Panning returns the notifications the host should deliver.
//! let events = view.pan_by(Vec2::new(40.0, 0.0));
//! assert_eq!(events.as_slice(), &[ViewEvent::MoveEnd]);
//!
//! drop(subscription);
//! assert!(view.hub().is_empty());
//! ```
//!
//! ## Design notes
//!
//! - Hosts are single‑threaded; subscriptions use `Rc` and are `!Send`.
//! - Notifications are values. A host routes each [`ViewEvent`] to the layers
//!   whose subscriptions want its [`ViewEventKinds`], using
//!   [`EventHub::subscribers_for`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod events;
mod geo;
mod mercator;
mod subscription;
mod view;

pub use events::{ViewEvent, ViewEventKinds};
pub use geo::GeoPoint;
pub use mercator::{EARTH_RADIUS, MAX_LATITUDE, MercatorView, TILE_SIZE, ViewEvents};
pub use subscription::{EventHub, Subscription, SubscriptionId};
pub use view::MapView;
