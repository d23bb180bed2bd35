//! Attach/detach bookkeeping for event subscriptions.

use crate::{AvatarId, EventKind, NavigationHook};

/// Everything a session controller subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Remote notification, delivered by the transport.
    Remote(EventKind),
    /// Asset loader `load` completion.
    AssetsLoad,
    /// Move events of a local avatar's input.
    InputMove(AvatarId),
    /// Navigation hook leading to the exit guard.
    Navigation(NavigationHook),
}

/// Set of live subscriptions for one owner.
///
/// `attach` and `detach` report whether the call changed the set, so the
/// owner forwards exactly one subscribe and one unsubscribe per key to the
/// collaborator. Detaching an absent key is a no-op.
#[derive(Debug, Clone)]
pub struct SubscriptionRegistry<K> {
    attached: Vec<K>,
}

impl<K> Default for SubscriptionRegistry<K> {
    fn default() -> Self {
        Self {
            attached: Vec::new(),
        }
    }
}

impl<K: PartialEq> SubscriptionRegistry<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key`; returns false if it was already attached.
    pub fn attach(&mut self, key: K) -> bool {
        if self.attached.contains(&key) {
            return false;
        }
        self.attached.push(key);
        true
    }

    /// Forget `key`; returns false if it was not attached.
    pub fn detach(&mut self, key: &K) -> bool {
        match self.attached.iter().position(|k| k == key) {
            Some(index) => {
                self.attached.remove(index);
                true
            }
            None => false,
        }
    }

    /// Detach every key matching `filter`, in attach order.
    pub fn detach_where(&mut self, mut filter: impl FnMut(&K) -> bool) -> Vec<K> {
        let (removed, kept) = std::mem::take(&mut self.attached)
            .into_iter()
            .partition(|k| filter(k));
        self.attached = kept;
        removed
    }

    /// Detach everything, in attach order.
    pub fn drain(&mut self) -> Vec<K> {
        std::mem::take(&mut self.attached)
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.attached.contains(key)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.attached.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.attached.iter()
    }
}
