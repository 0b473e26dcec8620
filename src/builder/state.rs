//! Builder for a single state node.

use crate::builder::transition::TransitionBuilder;
use crate::core::{Event, State};
use crate::effects::Invoke;

/// Configures one state: its event table, eventless list, invoked effect and
/// finality.
pub struct StateBuilder<S, C, E: Event> {
    pub(crate) state: S,
    pub(crate) on: Vec<(E::Kind, TransitionBuilder<S, C, E>)>,
    pub(crate) always: Vec<TransitionBuilder<S, C, E>>,
    pub(crate) invoke: Option<Invoke<C, E>>,
    pub(crate) is_final: bool,
}

impl<S: State, C, E: Event> StateBuilder<S, C, E> {
    /// Start configuring `state`. Finality defaults to `state.is_final()`.
    pub fn new(state: S) -> Self {
        let is_final = state.is_final();
        Self {
            state,
            on: Vec::new(),
            always: Vec::new(),
            invoke: None,
            is_final,
        }
    }

    /// Add a candidate transition for `kind`.
    ///
    /// Calling this several times for the same kind adds candidates in order;
    /// the first one whose guard passes is taken.
    pub fn on(mut self, kind: E::Kind, transition: TransitionBuilder<S, C, E>) -> Self {
        self.on.push((kind, transition));
        self
    }

    /// Add an eventless transition, evaluated after every settled step.
    pub fn always(mut self, transition: TransitionBuilder<S, C, E>) -> Self {
        self.always.push(transition);
        self
    }

    /// Bind an effect to this state's lifetime. A later call replaces it.
    pub fn invoke(mut self, invoke: Invoke<C, E>) -> Self {
        self.invoke = Some(invoke);
        self
    }

    /// Mark the state final.
    pub fn final_state(mut self) -> Self {
        self.is_final = true;
        self
    }

    pub(crate) fn has_transitions(&self) -> bool {
        !self.on.is_empty() || !self.always.is_empty() || self.invoke.is_some()
    }
}
