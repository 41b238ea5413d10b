// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Member shapes and the arena that references them.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use smallvec::SmallVec;
use understory_map_view::MapView;

use crate::bounds::PixelBounds;

/// What a shape sees when the surface calls into it.
#[derive(Clone, Copy)]
pub struct ShapeContext<'a> {
    /// The host viewport, for projecting geographic geometry.
    pub view: &'a dyn MapView,
    /// The surface's current pixel bounds, for clipping.
    pub bounds: PixelBounds,
}

impl fmt::Debug for ShapeContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeContext")
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

/// A vector primitive drawn on a [`VectorSurface`](crate::VectorSurface).
///
/// The surface decides *when* each method runs; the shape decides *what* it
/// does. Within one notification the surface calls `reset`, then `project`,
/// then `update`, skipping whichever do not apply.
///
/// Panics raised here are not caught by the surface.
pub trait MemberShape {
    /// The view was reset wholesale. Drop anything derived from the old view.
    fn reset(&mut self, cx: &ShapeContext<'_>) {
        let _ = cx;
    }

    /// Re‑derive pixel geometry from geographic geometry.
    fn project(&mut self, cx: &ShapeContext<'_>);

    /// Redraw from the already projected geometry.
    fn update(&mut self, cx: &ShapeContext<'_>);
}

/// Shared reference to a registered shape.
pub type SharedShape = Rc<RefCell<dyn MemberShape>>;

/// The shapes one dispatch notifies, captured before its first callback.
pub(crate) type Members = SmallVec<[(ShapeId, SharedShape); 16]>;

/// Opaque handle to a shape registered with a [`ShapeRegistry`].
///
/// A slot index plus a generation. Removing a shape frees its slot; when the
/// slot is reused its generation increments, so a stale `ShapeId` never refers
/// to a different shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShapeId(u32, u32);

impl ShapeId {
    const fn idx(self) -> usize {
        self.0 as usize
    }
}

struct Slot {
    generation: u32,
    shape: Option<SharedShape>,
}

#[derive(Default)]
struct ShapeArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl ShapeArena {
    fn insert(&mut self, shape: SharedShape) -> ShapeId {
        self.len += 1;
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation += 1;
            slot.shape = Some(shape);
            return ShapeId(idx, slot.generation);
        }
        let idx = u32::try_from(self.slots.len()).expect("too many shapes for ShapeId (u32)");
        self.slots.push(Slot {
            generation: 1,
            shape: Some(shape),
        });
        ShapeId(idx, 1)
    }

    fn slot(&self, id: ShapeId) -> Option<&Slot> {
        self.slots
            .get(id.idx())
            .filter(|slot| slot.generation == id.1 && slot.shape.is_some())
    }

    fn remove(&mut self, id: ShapeId) -> Option<SharedShape> {
        self.slot(id)?;
        let shape = self.slots[id.idx()].shape.take();
        self.free.push(id.0);
        self.len -= 1;
        shape
    }
}

/// Arena of member shapes, keyed by [`ShapeId`].
///
/// Cloning yields another handle to the same arena, so a shape can keep one
/// and register or unregister shapes from inside a notification. Such changes
/// are safe while the surface is dispatching:
/// - shapes added during a dispatch are first notified by the next one;
/// - shapes removed during a dispatch are not notified again.
///
/// A full reset is a single dispatch: its `reset`, `project` and `update`
/// passes all walk the same set of shapes.
///
/// Registration order is not meaningful.
#[derive(Clone, Default)]
pub struct ShapeRegistry {
    arena: Rc<RefCell<ShapeArena>>,
}

impl fmt::Debug for ShapeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeRegistry")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl ShapeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `shape` and returns its handle.
    ///
    /// The registry only references the shape; registering the same shape
    /// twice yields two handles and two notifications per dispatch.
    pub fn register(&self, shape: SharedShape) -> ShapeId {
        self.arena.borrow_mut().insert(shape)
    }

    /// Unregisters the shape behind `id`, returning it if `id` was live.
    pub fn unregister(&self, id: ShapeId) -> Option<SharedShape> {
        self.arena.borrow_mut().remove(id)
    }

    /// Returns `true` if `id` refers to a registered shape.
    #[must_use]
    pub fn contains(&self, id: ShapeId) -> bool {
        self.arena.borrow().slot(id).is_some()
    }

    /// Returns the shape behind `id`, if it is registered.
    #[must_use]
    pub fn get(&self, id: ShapeId) -> Option<SharedShape> {
        self.arena
            .borrow()
            .slot(id)
            .and_then(|slot| slot.shape.clone())
    }

    /// Number of registered shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.borrow().len
    }

    /// Returns `true` if no shapes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Handles of all registered shapes.
    #[must_use]
    pub fn ids(&self) -> Vec<ShapeId> {
        self.members().into_iter().map(|(id, _)| id).collect()
    }

    /// Calls `f` on each of `members` that is still registered.
    ///
    /// The arena is not borrowed while `f` runs. Before each call the handle
    /// is re‑checked so shapes removed by an earlier callback are skipped.
    /// Returns the number of shapes visited.
    pub(crate) fn for_each_member(
        &self,
        members: &Members,
        mut f: impl FnMut(&mut dyn MemberShape),
    ) -> usize {
        let mut visited = 0;
        for (id, shape) in members {
            if !self.contains(*id) {
                continue;
            }
            f(&mut *shape.borrow_mut());
            visited += 1;
        }
        visited
    }

    /// Captures the currently registered shapes.
    pub(crate) fn members(&self) -> Members {
        let arena = self.arena.borrow();
        arena
            .slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| {
                let shape = slot.shape.as_ref()?;
                let idx = u32::try_from(idx).ok()?;
                Some((ShapeId(idx, slot.generation), Rc::clone(shape)))
            })
            .collect()
    }
}
