//! Builder API for ergonomic machine construction.
//!
//! This module provides fluent builders and macros for declaring machines
//! with minimal boilerplate. Nothing is checked until
//! [`MachineBuilder::build`], which reports every definition problem at once.

pub mod implementations;
pub mod machine;
pub mod macros;
pub mod state;
pub mod transition;

pub use implementations::Implementations;
pub use machine::MachineBuilder;
pub use state::StateBuilder;
pub use transition::TransitionBuilder;

/// Create an unguarded transition to `target` with no actions.
///
/// # Example
///
/// ```
/// use statecraft::builder::goto;
/// use statecraft::state_enum;
///
/// state_enum! {
///     enum Door {
///         Open,
///         Closed,
///     }
/// }
///
/// let transition = goto::<Door, (), ()>(Door::Closed);
/// assert!(transition.has_target());
/// ```
pub fn goto<S, C, E>(target: S) -> TransitionBuilder<S, C, E> {
    TransitionBuilder::new().to(target)
}

/// Create a transition to `target` taken only when `guard` passes.
///
/// # Example
///
/// ```
/// use statecraft::builder::guarded;
/// use statecraft::state_enum;
///
/// state_enum! {
///     enum Door {
///         Open,
///         Closed,
///     }
/// }
///
/// let transition = guarded::<Door, u32, (), _>(Door::Closed, |pushes: &u32, _| *pushes > 0);
/// assert!(transition.has_target());
/// ```
pub fn guarded<S, C, E, F>(target: S, guard: F) -> TransitionBuilder<S, C, E>
where
    F: Fn(&C, Option<&E>) -> bool + Send + Sync + 'static,
{
    TransitionBuilder::new().to(target).when(guard)
}
