//! Resolved transition descriptors.

use crate::core::{Action, Guard};
use std::fmt;

/// A validated transition: optional guard, ordered actions, optional target.
///
/// A descriptor without a target is internal: it may update the context but
/// never exits the current state.
pub struct TransitionDef<S, C, E> {
    pub(crate) guard: Option<Guard<C, E>>,
    pub(crate) actions: Vec<Action<C, E>>,
    pub(crate) target: Option<S>,
}

impl<S, C, E> TransitionDef<S, C, E> {
    pub fn target(&self) -> Option<&S> {
        self.target.as_ref()
    }

    pub fn actions(&self) -> &[Action<C, E>] {
        &self.actions
    }

    pub fn is_internal(&self) -> bool {
        self.target.is_none()
    }

    pub fn is_guarded(&self) -> bool {
        self.guard.is_some()
    }

    /// A missing guard always passes.
    pub fn is_enabled(&self, context: &C, event: Option<&E>) -> bool {
        self.guard.as_ref().map_or(true, |g| g.check(context, event))
    }
}

impl<S: Clone, C, E> Clone for TransitionDef<S, C, E> {
    fn clone(&self) -> Self {
        Self {
            guard: self.guard.clone(),
            actions: self.actions.clone(),
            target: self.target.clone(),
        }
    }
}

impl<S: fmt::Debug, C, E> fmt::Debug for TransitionDef<S, C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionDef")
            .field("guarded", &self.guard.is_some())
            .field("actions", &self.actions)
            .field("target", &self.target)
            .finish()
    }
}
