// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use tracing::{debug, trace};
use understory_map_view::{GeoPoint, MapView, Subscription, ViewEvent, ViewEventKinds};

use crate::backend::DrawSurface;
use crate::bounds::{PixelBounds, ViewSnapshot, padded_bounds};
use crate::options::SurfaceOptions;
use crate::shape::{Members, ShapeContext, ShapeId, ShapeRegistry, SharedShape};
use crate::transform::{SurfaceTransform, compute_transform};

/// Lifecycle phase of a [`VectorSurface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SurfacePhase {
    /// Not attached to a viewport. Notifications are ignored.
    #[default]
    Detached,
    /// Attached, resting at the identity transform.
    Idle,
    /// Attached and following a zoom gesture through incremental transforms.
    Animating,
}

/// What a notification did to the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SurfaceEvent {
    /// Only the surface placement changed; no shape was touched.
    Transformed(SurfaceTransform),
    /// Every member shape re‑projected its geometry.
    Projected,
    /// Bounds were recomputed and the `update` notification went out: every
    /// member shape redrew. Outer listeners needing the final state redraw
    /// here too.
    Updated(PixelBounds),
}

/// Error returned by [`VectorSurface::attach`].
#[derive(Clone, PartialEq, Eq)]
pub enum AttachError<E> {
    /// The surface is already attached to a viewport.
    AlreadyAttached,
    /// The backend could not create its drawable.
    Backend(E),
}

impl<E: fmt::Debug> fmt::Debug for AttachError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyAttached => f.write_str("AlreadyAttached"),
            Self::Backend(err) => f.debug_tuple("Backend").field(err).finish(),
        }
    }
}

impl<E: fmt::Display> fmt::Display for AttachError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyAttached => f.write_str("surface is already attached to a viewport"),
            Self::Backend(err) => write!(f, "failed to acquire drawing surface: {err}"),
        }
    }
}

impl<E: core::error::Error + 'static> core::error::Error for AttachError<E> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::AlreadyAttached => None,
            Self::Backend(err) => Some(err),
        }
    }
}

/// Keeps a drawing backend and its member shapes in sync with a map viewport.
///
/// The surface tracks the pixel bounds and the view snapshot they were
/// computed for, and reacts to [`ViewEvent`]s:
///
/// | Notification | Bounds | Transform | Shapes |
/// |---|---|---|---|
/// | `ZoomAnim` / `Zoom` | kept | incremental | untouched |
/// | `MoveEnd` | recomputed | identity | `update` |
/// | `ZoomEnd` | kept | kept | `project` |
/// | `ViewReset` | recomputed | identity | `reset`, `project`, `update` |
///
/// Within one notification, bounds and transform reach the backend before any
/// shape is called.
#[derive(Debug)]
pub struct VectorSurface<B> {
    backend: B,
    options: SurfaceOptions,
    shapes: ShapeRegistry,
    phase: SurfacePhase,
    bounds: Option<PixelBounds>,
    snapshot: Option<ViewSnapshot>,
    transform: Option<SurfaceTransform>,
    subscription: Option<Subscription>,
}

impl<B: DrawSurface> VectorSurface<B> {
    /// Creates a detached surface over `backend` with default options.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self::with_options(backend, SurfaceOptions::default())
    }

    /// Creates a detached surface over `backend`.
    #[must_use]
    pub fn with_options(backend: B, options: SurfaceOptions) -> Self {
        Self {
            backend,
            options,
            shapes: ShapeRegistry::new(),
            phase: SurfacePhase::Detached,
            bounds: None,
            snapshot: None,
            transform: None,
            subscription: None,
        }
    }

    /// The options this surface was created with.
    #[must_use]
    pub fn options(&self) -> SurfaceOptions {
        self.options
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> SurfacePhase {
        self.phase
    }

    /// Returns `true` while attached to a viewport.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// The last computed pixel bounds.
    ///
    /// `None` until the first recomputation; stale but kept after detach.
    #[must_use]
    pub fn bounds(&self) -> Option<PixelBounds> {
        self.bounds
    }

    /// The view the current bounds were computed for.
    #[must_use]
    pub fn snapshot(&self) -> Option<ViewSnapshot> {
        self.snapshot
    }

    /// The transform last sent to the backend.
    #[must_use]
    pub fn transform(&self) -> Option<SurfaceTransform> {
        self.transform
    }

    /// The member shape registry. Clone it to hand shapes a handle.
    #[must_use]
    pub fn shapes(&self) -> &ShapeRegistry {
        &self.shapes
    }

    /// Registers a member shape.
    pub fn register(&self, shape: SharedShape) -> ShapeId {
        self.shapes.register(shape)
    }

    /// Unregisters a member shape.
    pub fn unregister(&self, id: ShapeId) -> Option<SharedShape> {
        self.shapes.unregister(id)
    }

    /// The drawing backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The drawing backend, mutably.
    #[must_use]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Attaches to `view`.
    ///
    /// Subscribes, acquires the backend's drawable, computes bounds and rests
    /// the surface at the identity transform. No shape is called. If the
    /// backend fails, the subscription is released before returning.
    pub fn attach(&mut self, view: &dyn MapView) -> Result<(), AttachError<B::Error>> {
        if self.is_attached() {
            return Err(AttachError::AlreadyAttached);
        }
        let subscription = view.subscribe(Self::interest(view.zoom_animated()));
        self.backend.acquire().map_err(AttachError::Backend)?;

        let bounds = self.recompute_bounds(view);
        self.backend.set_bounds(bounds);
        self.rest_transform(view);

        debug!(
            subscription = subscription.id().as_u64(),
            interest = ?subscription.interest(),
            "attached vector surface"
        );
        self.subscription = Some(subscription);
        self.phase = SurfacePhase::Idle;
        Ok(())
    }

    /// Detaches from the viewport: unsubscribes and releases the drawable.
    ///
    /// Bounds and snapshot are kept, stale. Returns `false` if the surface was
    /// not attached.
    pub fn detach(&mut self) -> bool {
        let Some(subscription) = self.subscription.take() else {
            return false;
        };
        subscription.release();
        self.backend.release();
        self.phase = SurfacePhase::Detached;
        debug!("detached vector surface");
        true
    }

    /// Recomputes the padded pixel bounds and the view snapshot from `view`.
    ///
    /// Touches neither the backend nor any shape.
    pub fn recompute_bounds(&mut self, view: &dyn MapView) -> PixelBounds {
        let bounds = padded_bounds(view, self.options.padding());
        let snapshot = ViewSnapshot::capture(view);
        debug!(
            padding = self.options.padding(),
            ?bounds,
            zoom = snapshot.zoom(),
            "recomputed surface bounds"
        );
        self.bounds = Some(bounds);
        self.snapshot = Some(snapshot);
        bounds
    }

    /// Computes the transform that makes content drawn for the current
    /// snapshot approximate `target_center`/`target_zoom`.
    ///
    /// `None` before bounds were first computed. Does not apply anything.
    #[must_use]
    pub fn compute_transform(
        &self,
        view: &dyn MapView,
        target_center: GeoPoint,
        target_zoom: f64,
    ) -> Option<SurfaceTransform> {
        let snapshot = self.snapshot?;
        Some(compute_transform(
            view,
            &snapshot,
            self.options.padding(),
            target_center,
            target_zoom,
        ))
    }

    /// Reacts to one view notification.
    ///
    /// Returns `None` when the surface is detached or not subscribed to this
    /// kind of notification.
    pub fn handle_event(&mut self, view: &dyn MapView, event: ViewEvent) -> Option<SurfaceEvent> {
        let wanted = self
            .subscription
            .as_ref()
            .is_some_and(|subscription| subscription.wants(event.kind()));
        if !wanted {
            trace!(?event, "ignored view notification");
            return None;
        }

        match event {
            ViewEvent::ZoomAnim { center, zoom } => self.animate_to(view, center, zoom),
            ViewEvent::Zoom => self.animate_to(view, view.center(), view.zoom()),
            ViewEvent::MoveEnd => Some(SurfaceEvent::Updated(self.settle(view))),
            ViewEvent::ZoomEnd => {
                let bounds = self.bounds?;
                self.project_shapes(view, bounds, &self.shapes.members());
                self.phase = SurfacePhase::Idle;
                Some(SurfaceEvent::Projected)
            }
            ViewEvent::ViewReset => self.full_reset(view).map(SurfaceEvent::Updated),
        }
    }

    /// Re‑synchronizes everything with `view`.
    ///
    /// Recomputes bounds, rests the transform, then calls `reset` and
    /// `project` on every shape and sends the `update` notification. The
    /// three passes walk the shapes registered when the reset starts, so each
    /// of them sees exactly one `project` before its `update`.
    ///
    /// Returns `None` and does nothing while detached.
    pub fn full_reset(&mut self, view: &dyn MapView) -> Option<PixelBounds> {
        if !self.is_attached() {
            trace!("ignored full reset while detached");
            return None;
        }
        debug!("full surface reset");
        let bounds = self.recompute_bounds(view);
        self.backend.set_bounds(bounds);
        self.rest_transform(view);

        let members = self.shapes.members();
        self.reset_shapes(view, bounds, &members);
        self.project_shapes(view, bounds, &members);
        self.notify_update(view, bounds, &members);
        self.phase = SurfacePhase::Idle;
        Some(bounds)
    }

    fn interest(zoom_animated: bool) -> ViewEventKinds {
        let mut interest = ViewEventKinds::VIEW_RESET
            | ViewEventKinds::ZOOM
            | ViewEventKinds::MOVE_END
            | ViewEventKinds::ZOOM_END;
        if zoom_animated {
            interest |= ViewEventKinds::ZOOM_ANIM;
        }
        interest
    }

    fn animate_to(
        &mut self,
        view: &dyn MapView,
        center: GeoPoint,
        zoom: f64,
    ) -> Option<SurfaceEvent> {
        let transform = self.compute_transform(view, center, zoom)?;
        let applied = self.apply_transform(transform);
        trace!(scale = applied.scale, origin = ?applied.origin, "zoom frame");
        self.phase = SurfacePhase::Animating;
        Some(SurfaceEvent::Transformed(applied))
    }

    /// Pan settled: new bounds, identity transform, `update` notification.
    fn settle(&mut self, view: &dyn MapView) -> PixelBounds {
        let bounds = self.recompute_bounds(view);
        self.backend.set_bounds(bounds);
        self.rest_transform(view);
        self.notify_update(view, bounds, &self.shapes.members());
        self.phase = SurfacePhase::Idle;
        bounds
    }

    /// Applies the transform for the snapshot itself.
    fn rest_transform(&mut self, view: &dyn MapView) {
        if let Some(snapshot) = self.snapshot {
            let transform = compute_transform(
                view,
                &snapshot,
                self.options.padding(),
                snapshot.center(),
                snapshot.zoom(),
            );
            self.apply_transform(transform);
        }
    }

    fn apply_transform(&mut self, transform: SurfaceTransform) -> SurfaceTransform {
        let transform = if self.backend.supports_scale() {
            transform
        } else {
            transform.without_scale()
        };
        self.backend.set_transform(transform);
        self.transform = Some(transform);
        transform
    }

    fn reset_shapes(&self, view: &dyn MapView, bounds: PixelBounds, members: &Members) {
        let cx = ShapeContext { view, bounds };
        let count = self
            .shapes
            .for_each_member(members, |shape| shape.reset(&cx));
        trace!(count, "reset member shapes");
    }

    fn project_shapes(&self, view: &dyn MapView, bounds: PixelBounds, members: &Members) {
        let cx = ShapeContext { view, bounds };
        let count = self
            .shapes
            .for_each_member(members, |shape| shape.project(&cx));
        trace!(count, "projected member shapes");
    }

    /// The `update` notification: every shape redraws from projected geometry.
    fn notify_update(&self, view: &dyn MapView, bounds: PixelBounds, members: &Members) {
        let cx = ShapeContext { view, bounds };
        let count = self
            .shapes
            .for_each_member(members, |shape| shape.update(&cx));
        trace!(count, "updated member shapes");
    }
}
