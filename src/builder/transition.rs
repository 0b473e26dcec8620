//! Builder for transition descriptors.

use crate::builder::implementations::Implementations;
use crate::core::{Action, Guard, State};
use crate::definition::{DefinitionError, TransitionDef};
use crate::effects::EventSender;
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

enum GuardRef<C, E> {
    Inline(Guard<C, E>),
    Named(String),
}

enum ActionRef<C, E> {
    Inline(Action<C, E>),
    Named(String),
}

/// Builder for a transition with a fluent API.
///
/// Every part is optional: no guard means always enabled, no target means an
/// internal transition, no actions means the context is left untouched.
pub struct TransitionBuilder<S, C, E> {
    target: Option<S>,
    guard: Option<GuardRef<C, E>>,
    actions: Vec<ActionRef<C, E>>,
}

impl<S, C, E> TransitionBuilder<S, C, E> {
    pub fn new() -> Self {
        Self {
            target: None,
            guard: None,
            actions: Vec::new(),
        }
    }

    /// Set the target state. Targeting the current state exits and re-enters it.
    pub fn to(mut self, state: S) -> Self {
        self.target = Some(state);
        self
    }

    pub fn guard(mut self, guard: Guard<C, E>) -> Self {
        self.guard = Some(GuardRef::Inline(guard));
        self
    }

    /// Add a guard using a closure.
    pub fn when<F>(self, predicate: F) -> Self
    where
        F: Fn(&C, Option<&E>) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::new(predicate))
    }

    /// Refer to a guard by name; resolved when the machine is built.
    pub fn guard_named(mut self, name: impl Into<String>) -> Self {
        self.guard = Some(GuardRef::Named(name.into()));
        self
    }

    pub fn action(mut self, action: Action<C, E>) -> Self {
        self.actions.push(ActionRef::Inline(action));
        self
    }

    /// Refer to an action by name; resolved when the machine is built.
    pub fn action_named(mut self, name: impl Into<String>) -> Self {
        self.actions.push(ActionRef::Named(name.into()));
        self
    }

    pub fn assign<F>(self, f: F) -> Self
    where
        F: Fn(&C, Option<&E>) -> C + Send + Sync + 'static,
    {
        self.action(Action::assign(f))
    }

    pub fn exec<F>(self, f: F) -> Self
    where
        F: Fn(&C, Option<&E>, &EventSender<E>) + Send + Sync + 'static,
    {
        self.action(Action::exec(f))
    }

    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }

    /// Resolve named references and check the target, collecting every problem.
    pub(crate) fn resolve(
        &self,
        scope: &str,
        declared: &HashSet<S>,
        implementations: &Implementations<C, E>,
    ) -> Validation<TransitionDef<S, C, E>, NonEmptyVec<DefinitionError>>
    where
        S: State,
    {
        let mut checks: Vec<Validation<(), NonEmptyVec<DefinitionError>>> = Vec::new();

        if let Some(target) = &self.target {
            if !declared.contains(target) {
                checks.push(Validation::fail(DefinitionError::UnknownTarget {
                    scope: scope.to_string(),
                    target: target.name().to_string(),
                }));
            }
        }

        let guard = match &self.guard {
            None => None,
            Some(GuardRef::Inline(guard)) => Some(guard.clone()),
            Some(GuardRef::Named(name)) => {
                let found = implementations.guard(name).cloned();
                if found.is_none() {
                    checks.push(Validation::fail(DefinitionError::UnknownGuard {
                        scope: scope.to_string(),
                        name: name.clone(),
                    }));
                }
                found
            }
        };

        let mut actions = Vec::with_capacity(self.actions.len());
        for action in &self.actions {
            match action {
                ActionRef::Inline(action) => actions.push(action.clone()),
                ActionRef::Named(name) => match implementations.action(name) {
                    Some(action) => actions.push(action.clone()),
                    None => checks.push(Validation::fail(DefinitionError::UnknownAction {
                        scope: scope.to_string(),
                        name: name.clone(),
                    })),
                },
            }
        }

        match Validation::all_vec(checks) {
            Validation::Success(_) => Validation::success(TransitionDef {
                guard,
                actions,
                target: self.target.clone(),
            }),
            Validation::Failure(errors) => Validation::Failure(errors),
        }
    }
}

impl<S, C, E> Default for TransitionBuilder<S, C, E> {
    fn default() -> Self {
        Self::new()
    }
}
