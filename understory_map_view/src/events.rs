// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::geo::GeoPoint;

/// A view notification raised by the host viewport.
///
/// Hosts deliver these synchronously, one at a time, from their own event
/// dispatch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewEvent {
    /// The view was reset wholesale (for example a non‑animated `set_view`).
    ///
    /// Layers must assume every previously projected coordinate is invalid.
    ViewReset,
    /// One frame of an animated zoom gesture.
    ///
    /// Carries the interpolated target of this frame. The host's own
    /// center/zoom still describe where the gesture started.
    ZoomAnim {
        /// Interpolated center of this frame.
        center: GeoPoint,
        /// Interpolated zoom of this frame.
        zoom: f64,
    },
    /// The zoom changed without an animation frame payload.
    ///
    /// Consumers read the target from the host's current center/zoom.
    Zoom,
    /// Movement settled (pan finished, or the tail of a zoom).
    MoveEnd,
    /// A zoom gesture finished.
    ZoomEnd,
}

impl ViewEvent {
    /// Returns the kind bit for this notification.
    #[must_use]
    pub fn kind(&self) -> ViewEventKinds {
        match self {
            Self::ViewReset => ViewEventKinds::VIEW_RESET,
            Self::ZoomAnim { .. } => ViewEventKinds::ZOOM_ANIM,
            Self::Zoom => ViewEventKinds::ZOOM,
            Self::MoveEnd => ViewEventKinds::MOVE_END,
            Self::ZoomEnd => ViewEventKinds::ZOOM_END,
        }
    }
}

bitflags::bitflags! {
    /// Set of notification kinds a subscriber is interested in.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ViewEventKinds: u8 {
        /// [`ViewEvent::ViewReset`].
        const VIEW_RESET = 0b0000_0001;
        /// [`ViewEvent::ZoomAnim`].
        const ZOOM_ANIM  = 0b0000_0010;
        /// [`ViewEvent::Zoom`].
        const ZOOM       = 0b0000_0100;
        /// [`ViewEvent::MoveEnd`].
        const MOVE_END   = 0b0000_1000;
        /// [`ViewEvent::ZoomEnd`].
        const ZOOM_END   = 0b0001_0000;
    }
}

impl Default for ViewEventKinds {
    fn default() -> Self {
        Self::empty()
    }
}
