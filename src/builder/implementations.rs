//! Named guard and action implementations.

use crate::core::{Action, Guard};
use std::collections::HashMap;

/// Maps guard and action names to their implementations.
///
/// Definitions can refer to guards and actions by name (see
/// [`TransitionBuilder::guard_named`](crate::builder::TransitionBuilder::guard_named)).
/// Names are resolved once when the machine is built; an unresolved name is a
/// definition error.
///
/// # Example
///
/// ```rust
/// use statecraft::builder::Implementations;
/// use statecraft::core::Action;
///
/// #[derive(Clone, Debug)]
/// struct Counter {
///     count: u32,
/// }
///
/// let implementations: Implementations<Counter, ()> = Implementations::new()
///     .with_guard("aboveZero", |ctx: &Counter, _| ctx.count > 0)
///     .with_action(
///         "decrement",
///         Action::assign(|ctx: &Counter, _| Counter { count: ctx.count - 1 }),
///     );
///
/// assert!(implementations.guard("aboveZero").is_some());
/// assert!(implementations.action("increment").is_none());
/// ```
pub struct Implementations<C, E> {
    guards: HashMap<String, Guard<C, E>>,
    actions: HashMap<String, Action<C, E>>,
}

impl<C, E> Implementations<C, E> {
    pub fn new() -> Self {
        Self {
            guards: HashMap::new(),
            actions: HashMap::new(),
        }
    }

    /// Register a guard predicate under `name`.
    pub fn with_guard<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&C, Option<&E>) -> bool + Send + Sync + 'static,
    {
        self.guards.insert(name.into(), Guard::new(predicate));
        self
    }

    /// Register an action under `name`.
    pub fn with_action(mut self, name: impl Into<String>, action: Action<C, E>) -> Self {
        self.actions.insert(name.into(), action);
        self
    }

    pub fn guard(&self, name: &str) -> Option<&Guard<C, E>> {
        self.guards.get(name)
    }

    pub fn action(&self, name: &str) -> Option<&Action<C, E>> {
        self.actions.get(name)
    }

    /// Merge `other` into `self`; entries of `other` win on name clashes.
    pub fn extend(&mut self, other: Self) {
        self.guards.extend(other.guards);
        self.actions.extend(other.actions);
    }
}

impl<C, E> Default for Implementations<C, E> {
    fn default() -> Self {
        Self::new()
    }
}
