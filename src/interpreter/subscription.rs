//! Snapshot observers.

use crate::core::Snapshot;
use std::fmt;

/// Token returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

type Observer<S, C> = Box<dyn FnMut(&Snapshot<S, C>) + Send>;

/// Observers in registration order.
pub(crate) struct Subscribers<S, C> {
    next: u64,
    observers: Vec<(SubscriptionId, Observer<S, C>)>,
}

impl<S, C> Subscribers<S, C> {
    pub(crate) fn new() -> Self {
        Self {
            next: 0,
            observers: Vec::new(),
        }
    }

    pub(crate) fn allocate(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next);
        self.next += 1;
        id
    }

    pub(crate) fn insert(&mut self, id: SubscriptionId, observer: Observer<S, C>) {
        self.observers.push((id, observer));
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub(crate) fn notify(&mut self, snapshot: &Snapshot<S, C>) {
        for (_, observer) in &mut self.observers {
            observer(snapshot);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.observers.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }
}
