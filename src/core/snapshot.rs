//! Observable interpreter snapshots.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The settled `{ state, context, done }` value emitted after a resolution.
///
/// Snapshots are immutable. The context is shared behind an `Arc`; two
/// snapshots share the same allocation when no assign action ran between
/// them.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<S, C> {
    state: S,
    context: Arc<C>,
    done: bool,
}

impl<S, C> Snapshot<S, C> {
    pub fn new(state: S, context: C, done: bool) -> Self {
        Self::from_shared(state, Arc::new(context), done)
    }

    pub(crate) fn from_shared(state: S, context: Arc<C>, done: bool) -> Self {
        Self {
            state,
            context,
            done,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    /// The shared context, for identity comparisons with `Arc::ptr_eq`.
    pub fn shared_context(&self) -> &Arc<C> {
        &self.context
    }

    /// True iff the state is final.
    pub fn done(&self) -> bool {
        self.done
    }

    pub fn matches(&self, state: &S) -> bool
    where
        S: PartialEq,
    {
        self.state == *state
    }
}

// Cloning shares the context, so `C` itself need not be `Clone`.
impl<S: Clone, C> Clone for Snapshot<S, C> {
    fn clone(&self) -> Self {
        Self::from_shared(self.state.clone(), Arc::clone(&self.context), self.done)
    }
}
