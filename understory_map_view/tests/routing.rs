// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for routing `MercatorView` notifications to subscribers.

use kurbo::{Size, Vec2};
use understory_map_view::{
    GeoPoint, MapView, MercatorView, SubscriptionId, ViewEvent, ViewEventKinds,
};

fn deliveries(view: &MercatorView, events: &[ViewEvent]) -> Vec<(SubscriptionId, ViewEvent)> {
    events
        .iter()
        .flat_map(|event| {
            view.hub()
                .subscribers_for(event.kind())
                .into_iter()
                .map(move |id| (id, *event))
        })
        .collect()
}

#[test]
fn notifications_reach_only_interested_subscribers() {
    let mut view = MercatorView::new(GeoPoint::new(48.85, 2.35), 12.0, Size::new(640.0, 480.0));
    let settled = view.subscribe(ViewEventKinds::MOVE_END);
    let zooms = view.subscribe(ViewEventKinds::ZOOM | ViewEventKinds::ZOOM_END);

    let events = view.pan_by(Vec2::new(5.0, 5.0));
    assert_eq!(
        deliveries(&view, &events),
        [(settled.id(), ViewEvent::MoveEnd)]
    );

    let center = view.center();
    let events = view.finish_zoom(center, 13.0);
    assert_eq!(
        deliveries(&view, &events),
        [
            (zooms.id(), ViewEvent::Zoom),
            (zooms.id(), ViewEvent::ZoomEnd),
            (settled.id(), ViewEvent::MoveEnd),
        ]
    );

    drop(zooms);
    let events = view.set_view(GeoPoint::new(0.0, 0.0), 3.0);
    assert_eq!(
        deliveries(&view, &events),
        [(settled.id(), ViewEvent::MoveEnd)]
    );
}

#[test]
fn zoom_frames_carry_their_own_target() {
    let view = MercatorView::new(GeoPoint::new(0.0, 0.0), 4.0, Size::new(256.0, 256.0));
    let target = GeoPoint::new(10.0, -20.0);
    let frame = view.zoom_frame(target, 4.25).unwrap();

    assert_eq!(frame.kind(), ViewEventKinds::ZOOM_ANIM);
    assert_eq!(
        frame,
        ViewEvent::ZoomAnim {
            center: target,
            zoom: 4.25
        }
    );
    // The host itself has not moved yet.
    assert_eq!(view.zoom(), 4.0);
    assert_eq!(view.center(), GeoPoint::new(0.0, 0.0));
}
