//! Transition actions.
//!
//! An action either computes a new context value (`Assign`) or performs an
//! external effect (`Exec`). Actions run in declaration order as part of a
//! selected transition and all see the same triggering event.

use crate::effects::EventSender;
use std::fmt;
use std::sync::Arc;

type AssignFn<C, E> = dyn Fn(&C, Option<&E>) -> C + Send + Sync;
type ExecFn<C, E> = dyn Fn(&C, Option<&E>, &EventSender<E>) + Send + Sync;

/// An action executed when a transition is taken.
///
/// # Example
///
/// ```rust
/// use statecraft::core::Action;
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Counter {
///     count: u32,
/// }
///
/// let increment: Action<Counter, ()> = Action::assign(|ctx: &Counter, _| Counter {
///     count: ctx.count + 1,
/// });
/// assert!(increment.is_assign());
/// ```
pub enum Action<C, E> {
    /// Produce the next context from the current one and the event.
    Assign(Arc<AssignFn<C, E>>),

    /// Perform an effect. The sender queues events back into the
    /// interpreter; they are processed after the current resolution settles.
    Exec(Arc<ExecFn<C, E>>),
}

impl<C, E> Action<C, E> {
    /// Create an assign action.
    pub fn assign<F>(f: F) -> Self
    where
        F: Fn(&C, Option<&E>) -> C + Send + Sync + 'static,
    {
        Action::Assign(Arc::new(f))
    }

    /// Create an exec action.
    pub fn exec<F>(f: F) -> Self
    where
        F: Fn(&C, Option<&E>, &EventSender<E>) + Send + Sync + 'static,
    {
        Action::Exec(Arc::new(f))
    }

    /// Create an exec action that queues one event computed from the context.
    pub fn raise<F>(f: F) -> Self
    where
        F: Fn(&C, Option<&E>) -> E + Send + Sync + 'static,
    {
        Self::exec(move |ctx, event, sender| {
            sender.send(f(ctx, event));
        })
    }

    pub fn is_assign(&self) -> bool {
        matches!(self, Action::Assign(_))
    }
}

impl<C, E> Clone for Action<C, E> {
    fn clone(&self) -> Self {
        match self {
            Action::Assign(f) => Action::Assign(Arc::clone(f)),
            Action::Exec(f) => Action::Exec(Arc::clone(f)),
        }
    }
}

impl<C, E> fmt::Debug for Action<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Assign(_) => f.write_str("Assign"),
            Action::Exec(_) => f.write_str("Exec"),
        }
    }
}

/// Run `actions` in order, threading the context through every assign.
///
/// Exec actions only run when a sender is supplied; pure lookahead queries
/// pass `None`. The returned `Arc` is the input one when no assign ran.
pub(crate) fn apply_actions<C, E>(
    actions: &[Action<C, E>],
    context: &Arc<C>,
    event: Option<&E>,
    sender: Option<&EventSender<E>>,
) -> Arc<C> {
    let mut current = Arc::clone(context);
    for action in actions {
        match action {
            Action::Assign(assign) => current = Arc::new(assign(&current, event)),
            Action::Exec(exec) => {
                if let Some(sender) = sender {
                    exec(&current, event, sender);
                }
            }
        }
    }
    current
}
