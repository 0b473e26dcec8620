//! Guard predicates for controlling transitions.
//!
//! Guards are pure boolean functions over the current context and the
//! triggering event. They decide whether a transition is eligible without
//! touching the context or causing effects.

use std::fmt;
use std::sync::Arc;

type Predicate<C, E> = dyn Fn(&C, Option<&E>) -> bool + Send + Sync;

/// Pure predicate that determines if a transition can be taken.
///
/// The event is `None` when the guard belongs to an eventless transition.
///
/// # Example
///
/// ```rust
/// use statecraft::core::Guard;
///
/// struct Counter {
///     count: u32,
/// }
///
/// let above_zero = Guard::new(|ctx: &Counter, _event: Option<&()>| ctx.count > 0);
///
/// assert!(above_zero.check(&Counter { count: 3 }, None));
/// assert!(!above_zero.check(&Counter { count: 0 }, None));
/// ```
pub struct Guard<C, E> {
    predicate: Arc<Predicate<C, E>>,
}

impl<C, E> Guard<C, E> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and free of side effects.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C, Option<&E>) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Create a guard that only looks at the context.
    pub fn context<F>(predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Self::new(move |ctx, _| predicate(ctx))
    }

    /// Check if the guard allows the transition.
    pub fn check(&self, context: &C, event: Option<&E>) -> bool {
        (self.predicate)(context, event)
    }
}

impl<C, E> Clone for Guard<C, E> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<C, E> fmt::Debug for Guard<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard")
    }
}
