//! Builder for machine definitions.

use crate::builder::implementations::Implementations;
use crate::builder::state::StateBuilder;
use crate::builder::transition::TransitionBuilder;
use crate::core::{Action, Event, State};
use crate::definition::{
    DefinitionError, DefinitionErrors, EventTable, MachineDefinition, StateNode, TransitionDef,
};
use std::collections::{HashMap, HashSet};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// A resolved transition together with where it belongs.
enum Placement<S, C, E: Event> {
    On {
        state: S,
        kind: E::Kind,
        def: TransitionDef<S, C, E>,
    },
    Always {
        state: S,
        def: TransitionDef<S, C, E>,
    },
    Global {
        kind: E::Kind,
        def: TransitionDef<S, C, E>,
    },
}

type Check<S, C, E> = Validation<Placement<S, C, E>, NonEmptyVec<DefinitionError>>;

/// Builder for constructing machine definitions with a fluent API.
///
/// # Example
///
/// ```rust
/// use statecraft::builder::{MachineBuilder, TransitionBuilder};
/// use statecraft::core::Event;
/// use statecraft::state_enum;
///
/// state_enum! {
///     enum CounterState {
///         Active,
///     }
/// }
///
/// #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// enum CounterEvent {
///     Increment,
///     Decrement,
/// }
///
/// impl Event for CounterEvent {
///     type Kind = Self;
///
///     fn kind(&self) -> Self {
///         *self
///     }
/// }
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Counter {
///     count: u32,
/// }
///
/// let machine = MachineBuilder::new(CounterState::Active, Counter { count: 0 })
///     .guard("aboveZero", |ctx: &Counter, _| ctx.count > 0)
///     .state(CounterState::Active, |s| {
///         s.on(
///             CounterEvent::Increment,
///             TransitionBuilder::new().assign(|ctx: &Counter, _| Counter { count: ctx.count + 1 }),
///         )
///         .on(
///             CounterEvent::Decrement,
///             TransitionBuilder::new()
///                 .guard_named("aboveZero")
///                 .assign(|ctx: &Counter, _| Counter { count: ctx.count - 1 }),
///         )
///     })
///     .build()
///     .unwrap();
///
/// assert!(!machine.can_accept(&machine.initial_snapshot(), &CounterEvent::Decrement));
/// ```
pub struct MachineBuilder<S: State, C, E: Event> {
    id: String,
    initial: S,
    context: C,
    states: Vec<StateBuilder<S, C, E>>,
    global: Vec<(E::Kind, TransitionBuilder<S, C, E>)>,
    implementations: Implementations<C, E>,
}

impl<S: State, C, E: Event> MachineBuilder<S, C, E> {
    /// Create a builder with the initial state and context.
    pub fn new(initial: S, context: C) -> Self {
        Self {
            id: "machine".to_string(),
            initial,
            context,
            states: Vec::new(),
            global: Vec::new(),
            implementations: Implementations::new(),
        }
    }

    /// Name used in logs and checkpoints.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Declare a state and configure it.
    pub fn state<F>(mut self, state: S, configure: F) -> Self
    where
        F: FnOnce(StateBuilder<S, C, E>) -> StateBuilder<S, C, E>,
    {
        self.states.push(configure(StateBuilder::new(state)));
        self
    }

    /// Declare a final state with no configuration.
    pub fn final_state(self, state: S) -> Self {
        self.state(state, StateBuilder::final_state)
    }

    /// Add a global handler, checked after the current state's own handlers.
    pub fn on(mut self, kind: E::Kind, transition: TransitionBuilder<S, C, E>) -> Self {
        self.global.push((kind, transition));
        self
    }

    /// Register a named guard.
    pub fn guard<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&C, Option<&E>) -> bool + Send + Sync + 'static,
    {
        self.implementations = self.implementations.with_guard(name, predicate);
        self
    }

    /// Register a named action.
    pub fn action(mut self, name: impl Into<String>, action: Action<C, E>) -> Self {
        self.implementations = self.implementations.with_action(name, action);
        self
    }

    /// Merge a separately built implementation map.
    pub fn implementations(mut self, implementations: Implementations<C, E>) -> Self {
        self.implementations.extend(implementations);
        self
    }

    /// Validate and build the definition.
    ///
    /// Returns every problem found, not just the first one.
    pub fn build(self) -> Result<MachineDefinition<S, C, E>, DefinitionErrors> {
        let mut declared = HashSet::new();
        let mut checks: Vec<Check<S, C, E>> = Vec::new();

        for draft in &self.states {
            if !declared.insert(draft.state.clone()) {
                checks.push(Validation::fail(DefinitionError::DuplicateState {
                    state: draft.state.name().to_string(),
                }));
            }
        }

        if !declared.contains(&self.initial) {
            checks.push(Validation::fail(DefinitionError::UnknownInitialState {
                state: self.initial.name().to_string(),
            }));
        }

        for draft in &self.states {
            let name = draft.state.name();
            if draft.is_final && draft.has_transitions() {
                checks.push(Validation::fail(DefinitionError::FinalStateHasTransitions {
                    state: name.to_string(),
                }));
            }

            for (kind, transition) in &draft.on {
                let scope = format!("state '{name}' on {kind:?}");
                checks.push(
                    transition
                        .resolve(&scope, &declared, &self.implementations)
                        .map(|def| Placement::On {
                            state: draft.state.clone(),
                            kind: *kind,
                            def,
                        }),
                );
            }

            for transition in &draft.always {
                let scope = format!("state '{name}' always");
                checks.push(
                    transition
                        .resolve(&scope, &declared, &self.implementations)
                        .map(|def| Placement::Always {
                            state: draft.state.clone(),
                            def,
                        }),
                );
            }
        }

        for (kind, transition) in &self.global {
            let scope = format!("global on {kind:?}");
            checks.push(
                transition
                    .resolve(&scope, &declared, &self.implementations)
                    .map(|def| Placement::Global { kind: *kind, def }),
            );
        }

        let placements = match Validation::all_vec(checks) {
            Validation::Success(placements) => placements,
            Validation::Failure(errors) => {
                let errors = DefinitionErrors::from(errors);
                tracing::debug!(machine = %self.id, errors = errors.len(), "machine definition rejected");
                return Err(errors);
            }
        };

        let mut states = HashMap::with_capacity(self.states.len());
        for draft in self.states {
            let StateBuilder {
                state,
                invoke,
                is_final,
                ..
            } = draft;
            states.insert(state, StateNode::new(invoke, is_final));
        }

        let mut global: EventTable<S, C, E> = HashMap::new();
        for placement in placements {
            match placement {
                Placement::On { state, kind, def } => {
                    if let Some(node) = states.get_mut(&state) {
                        node.on.entry(kind).or_default().push(def);
                    }
                }
                Placement::Always { state, def } => {
                    if let Some(node) = states.get_mut(&state) {
                        node.always.push(def);
                    }
                }
                Placement::Global { kind, def } => global.entry(kind).or_default().push(def),
            }
        }

        tracing::debug!(machine = %self.id, states = states.len(), "machine definition built");
        Ok(MachineDefinition::from_parts(
            self.id,
            self.initial,
            self.context,
            states,
            global,
        ))
    }
}
