// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::convert::Infallible;
use std::cell::RefCell;
use std::rc::Rc;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size, Vec2};
use understory_map_view::{GeoPoint, MapView, MercatorView, ViewEvent};
use understory_vector_surface::{
    DrawSurface, MemberShape, PixelBounds, ShapeContext, SurfaceTransform, VectorSurface,
};

struct NullCanvas;

impl DrawSurface for NullCanvas {
    type Error = Infallible;

    fn acquire(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn release(&mut self) {}

    fn set_bounds(&mut self, bounds: PixelBounds) {
        black_box(bounds);
    }

    fn set_transform(&mut self, transform: SurfaceTransform) {
        black_box(transform);
    }
}

/// A polyline that re‑projects its vertices and counts what it would draw.
struct Polyline {
    points: Vec<GeoPoint>,
    projected: Vec<Point>,
    visible: usize,
}

impl Polyline {
    fn new(seed: usize, len: usize) -> Self {
        let base = seed as f64 * 0.37;
        let points = (0..len)
            .map(|i| {
                let t = base + i as f64 * 0.05;
                GeoPoint::new((t * 1.3).sin() * 20.0, (t * 0.7).cos() * 40.0)
            })
            .collect();
        Self {
            points,
            projected: Vec::with_capacity(len),
            visible: 0,
        }
    }
}

impl MemberShape for Polyline {
    fn project(&mut self, cx: &ShapeContext<'_>) {
        self.projected.clear();
        self.projected
            .extend(self.points.iter().map(|p| cx.view.layer_point(*p)));
    }

    fn update(&mut self, cx: &ShapeContext<'_>) {
        self.visible = self
            .projected
            .iter()
            .filter(|p| cx.bounds.contains(**p))
            .count();
        black_box(self.visible);
    }
}

fn view() -> MercatorView {
    MercatorView::new(GeoPoint::new(0.0, 0.0), 3.0, Size::new(1280.0, 720.0))
}

fn attached(view: &MercatorView, shapes: usize) -> VectorSurface<NullCanvas> {
    let mut surface = VectorSurface::new(NullCanvas);
    for seed in 0..shapes {
        surface.register(Rc::new(RefCell::new(Polyline::new(seed, 64))));
    }
    surface.attach(view).expect("fresh surface attaches");
    surface
}

fn bench_vector_surface(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_vector_surface");
    group.sample_size(50);

    for &shapes in &[16_usize, 256, 2_048] {
        // A zoom gesture's frames never touch shape geometry, so their cost
        // must not grow with the shape count.
        group.bench_function(format!("zoom_frames_x60(shapes={shapes})"), |b| {
            let view = view();
            let mut surface = attached(&view, shapes);
            let center = view.center();
            b.iter(|| {
                for step in 0..60 {
                    let zoom = 3.0 + f64::from(step) / 60.0;
                    let frame = ViewEvent::ZoomAnim { center, zoom };
                    black_box(surface.handle_event(&view, frame));
                }
            });
        });

        group.bench_function(format!("pan_settle(shapes={shapes})"), |b| {
            b.iter_batched(
                || {
                    let mut view = view();
                    let surface = attached(&view, shapes);
                    view.pan_by(Vec2::new(120.0, -45.0));
                    (view, surface)
                },
                |(view, mut surface)| {
                    black_box(surface.handle_event(&view, ViewEvent::MoveEnd));
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("full_reset(shapes={shapes})"), |b| {
            let view = view();
            let mut surface = attached(&view, shapes);
            b.iter(|| black_box(surface.full_reset(&view)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_vector_surface);
criterion_main!(benches);
