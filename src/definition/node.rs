//! Per-state configuration.

use crate::core::Event;
use crate::definition::transition::TransitionDef;
use crate::effects::Invoke;
use std::collections::HashMap;
use std::fmt;

/// Transition table keyed by event kind; each entry keeps declaration order.
pub(crate) type EventTable<S, C, E> = HashMap<<E as Event>::Kind, Vec<TransitionDef<S, C, E>>>;

/// One state of a machine definition.
pub struct StateNode<S, C, E: Event> {
    pub(crate) on: EventTable<S, C, E>,
    pub(crate) always: Vec<TransitionDef<S, C, E>>,
    pub(crate) invoke: Option<Invoke<C, E>>,
    pub(crate) is_final: bool,
}

impl<S, C, E: Event> StateNode<S, C, E> {
    pub(crate) fn new(invoke: Option<Invoke<C, E>>, is_final: bool) -> Self {
        Self {
            on: HashMap::new(),
            always: Vec::new(),
            invoke,
            is_final,
        }
    }

    /// Candidates for an event kind, in declaration order.
    pub fn candidates(&self, kind: &E::Kind) -> &[TransitionDef<S, C, E>] {
        self.on.get(kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// Eventless transitions, in declaration order.
    pub fn always(&self) -> &[TransitionDef<S, C, E>] {
        &self.always
    }

    pub fn invoke(&self) -> Option<&Invoke<C, E>> {
        self.invoke.as_ref()
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Event kinds this state handles itself.
    pub fn handled_kinds(&self) -> impl Iterator<Item = &E::Kind> {
        self.on.keys()
    }
}

impl<S: fmt::Debug, C, E: Event> fmt::Debug for StateNode<S, C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateNode")
            .field("on", &self.on)
            .field("always", &self.always)
            .field("invoke", &self.invoke)
            .field("is_final", &self.is_final)
            .finish()
    }
}
