//! Validated machine definitions and pure transition selection.

use crate::core::{apply_actions, Event, Snapshot, State};
use crate::definition::node::{EventTable, StateNode};
use crate::definition::transition::TransitionDef;
use crate::effects::Invoke;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Static, validated description of a machine.
///
/// Definitions are produced by [`MachineBuilder`](crate::builder::MachineBuilder)
/// and never change afterwards. Every query on a definition is pure; running
/// effects and emitting snapshots is the interpreter's job.
pub struct MachineDefinition<S: State, C, E: Event> {
    id: String,
    initial: S,
    context: Arc<C>,
    states: HashMap<S, StateNode<S, C, E>>,
    global: EventTable<S, C, E>,
}

impl<S: State, C, E: Event> MachineDefinition<S, C, E> {
    pub(crate) fn from_parts(
        id: String,
        initial: S,
        context: C,
        states: HashMap<S, StateNode<S, C, E>>,
        global: EventTable<S, C, E>,
    ) -> Self {
        Self {
            id,
            initial,
            context: Arc::new(context),
            states,
            global,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn initial_state(&self) -> &S {
        &self.initial
    }

    pub fn initial_context(&self) -> &C {
        &self.context
    }

    /// Snapshot of the initial state before any eventless resolution.
    pub fn initial_snapshot(&self) -> Snapshot<S, C> {
        Snapshot::from_shared(
            self.initial.clone(),
            Arc::clone(&self.context),
            self.is_final(&self.initial),
        )
    }

    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.states.keys()
    }

    pub fn node(&self, state: &S) -> Option<&StateNode<S, C, E>> {
        self.states.get(state)
    }

    pub fn contains(&self, state: &S) -> bool {
        self.states.contains_key(state)
    }

    pub fn is_final(&self, state: &S) -> bool {
        self.node(state).is_some_and(StateNode::is_final)
    }

    pub fn invoke(&self, state: &S) -> Option<&Invoke<C, E>> {
        self.node(state).and_then(StateNode::invoke)
    }

    /// Select the transition `event` takes from `state`.
    ///
    /// State-local candidates are checked before global ones; within each
    /// list the first enabled candidate in declaration order wins. Final
    /// states select nothing.
    pub fn select(&self, state: &S, context: &C, event: &E) -> Option<&TransitionDef<S, C, E>> {
        let node = self.node(state)?;
        if node.is_final {
            return None;
        }
        let kind = event.kind();
        let global = self.global.get(&kind).map(Vec::as_slice).unwrap_or_default();
        node.candidates(&kind)
            .iter()
            .chain(global)
            .find(|t| t.is_enabled(context, Some(event)))
    }

    /// Select the first enabled eventless transition of `state`.
    pub fn select_eventless(&self, state: &S, context: &C) -> Option<&TransitionDef<S, C, E>> {
        self.node(state)?
            .always
            .iter()
            .find(|t| t.is_enabled(context, None))
    }

    /// One-step lookahead: the snapshot `event` would produce from `snapshot`.
    ///
    /// Runs assign actions only (exec actions and effects are skipped) and
    /// does not follow eventless transitions. Returns `None` when the event
    /// would be ignored.
    pub fn transition(&self, snapshot: &Snapshot<S, C>, event: &E) -> Option<Snapshot<S, C>> {
        let selected = self.select(snapshot.state(), snapshot.context(), event)?;
        let context = apply_actions(
            &selected.actions,
            snapshot.shared_context(),
            Some(event),
            None,
        );
        let state = selected.target.as_ref().unwrap_or(snapshot.state()).clone();
        let done = self.is_final(&state);
        Some(Snapshot::from_shared(state, context, done))
    }

    /// Whether `event` would be accepted from `snapshot`.
    ///
    /// Renderers use this to enable or disable affordances without sending
    /// anything.
    pub fn can_accept(&self, snapshot: &Snapshot<S, C>, event: &E) -> bool {
        self.select(snapshot.state(), snapshot.context(), event)
            .is_some()
    }
}

impl<S: State, C: fmt::Debug, E: Event> fmt::Debug for MachineDefinition<S, C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineDefinition")
            .field("id", &self.id)
            .field("initial", &self.initial)
            .field("context", &self.context)
            .field("states", &self.states)
            .field("global", &self.global)
            .finish()
    }
}
