// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owned subscriptions to view notifications.
//!
//! A host keeps an [`EventHub`]; every subscriber holds a [`Subscription`]
//! guard. The guard is the only way to stay subscribed: dropping it (or calling
//! [`Subscription::release`]) removes the entry, on every exit path.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;

use smallvec::SmallVec;

use crate::events::ViewEventKinds;

/// Identifier of a live subscription within one [`EventHub`].
///
/// Ids are never reused by the hub that issued them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Returns the raw numeric id.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
struct HubState {
    next_id: u64,
    entries: Vec<(SubscriptionId, ViewEventKinds)>,
}

/// Host‑side registry of subscriptions to view notifications.
///
/// Cloning the hub yields another handle to the same registry.
#[derive(Clone, Debug, Default)]
pub struct EventHub {
    state: Rc<RefCell<HubState>>,
}

impl EventHub {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers interest in `interest` and returns the owning guard.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, interest: ViewEventKinds) -> Subscription {
        let mut state = self.state.borrow_mut();
        let id = SubscriptionId(state.next_id);
        state.next_id += 1;
        state.entries.push((id, interest));
        Subscription {
            id,
            interest,
            hub: Rc::downgrade(&self.state),
        }
    }

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    /// Returns `true` if nothing is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `id` is still subscribed.
    #[must_use]
    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.interest(id).is_some()
    }

    /// Returns the interest mask registered for `id`, if it is live.
    #[must_use]
    pub fn interest(&self, id: SubscriptionId) -> Option<ViewEventKinds> {
        self.state
            .borrow()
            .entries
            .iter()
            .find(|(entry, _)| *entry == id)
            .map(|(_, interest)| *interest)
    }

    /// Returns the subscriptions interested in any of `kinds`.
    ///
    /// The result is a snapshot in subscription order; subscribing or
    /// unsubscribing while walking it is allowed.
    #[must_use]
    pub fn subscribers_for(&self, kinds: ViewEventKinds) -> SmallVec<[SubscriptionId; 4]> {
        self.state
            .borrow()
            .entries
            .iter()
            .filter(|(_, interest)| interest.intersects(kinds))
            .map(|(id, _)| *id)
            .collect()
    }
}

/// An owned subscription to view notifications.
///
/// Unsubscribes when dropped. Releasing twice, or after the hub itself is
/// gone, is a no‑op.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    interest: ViewEventKinds,
    hub: Weak<RefCell<HubState>>,
}

impl Subscription {
    /// Returns the id of this subscription.
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns the interest mask this subscription was created with.
    #[must_use]
    pub fn interest(&self) -> ViewEventKinds {
        self.interest
    }

    /// Returns `true` if this subscription wants notifications of `kind`.
    #[must_use]
    pub fn wants(&self, kind: ViewEventKinds) -> bool {
        self.interest.intersects(kind)
    }

    /// Returns `true` while the issuing hub still lists this subscription.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.hub.upgrade().is_some_and(|state| {
            state
                .borrow()
                .entries
                .iter()
                .any(|(entry, _)| *entry == self.id)
        })
    }

    /// Unsubscribes now.
    pub fn release(mut self) {
        self.unsubscribe();
    }

    fn unsubscribe(&mut self) {
        if let Some(state) = self.hub.upgrade() {
            state
                .borrow_mut()
                .entries
                .retain(|(entry, _)| *entry != self.id);
        }
        self.hub = Weak::new();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
