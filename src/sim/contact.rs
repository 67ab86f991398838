//! Contact state tracking for onset-gated resolution
//!
//! A chip resting against a wall stays overlapping for many ticks. Only the
//! tick on which contact begins should reflect it; the tracker remembers
//! which partners each collider is currently touching.

use std::collections::{BTreeMap, BTreeSet};

use super::collider::ColliderId;

/// Per-collider sets of partners currently recorded as touching
#[derive(Debug, Clone, Default)]
pub struct ContactTracker {
    contacts: BTreeMap<ColliderId, BTreeSet<ColliderId>>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `this` touches `other`.
    ///
    /// Returns true only when the contact is new (onset).
    pub fn register(&mut self, this: ColliderId, other: ColliderId) -> bool {
        self.contacts.entry(this).or_default().insert(other)
    }

    /// Forget a contact; absent pairs are ignored
    pub fn unregister(&mut self, this: ColliderId, other: ColliderId) {
        if let Some(set) = self.contacts.get_mut(&this) {
            set.remove(&other);
            if set.is_empty() {
                self.contacts.remove(&this);
            }
        }
    }

    pub fn is_touching(&self, this: ColliderId, other: ColliderId) -> bool {
        self.contacts
            .get(&this)
            .is_some_and(|set| set.contains(&other))
    }

    /// Remove every trace of a collider, both its own set and its membership
    /// in everyone else's
    pub fn purge(&mut self, id: ColliderId) {
        self.contacts.remove(&id);
        self.contacts.retain(|_, set| {
            set.remove(&id);
            !set.is_empty()
        });
    }

    /// Number of recorded (directed) contacts
    pub fn len(&self) -> usize {
        self.contacts.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}
