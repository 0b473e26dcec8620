//! Transition history tracking.
//!
//! Every transition that enters a state (as opposed to an internal transition
//! that only updates context) is recorded as an immutable value.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single state change.
///
/// # Example
///
/// ```rust
/// use statecraft::core::StateTransition;
/// use statecraft::state_enum;
/// use chrono::Utc;
///
/// state_enum! {
///     enum TimerState {
///         Running,
///         Paused,
///     }
/// }
///
/// let transition = StateTransition {
///     from: TimerState::Running,
///     to: TimerState::Paused,
///     event: None,
///     timestamp: Utc::now(),
/// };
/// assert!(transition.is_eventless());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being exited
    pub from: S,
    /// The state being entered
    pub to: S,
    /// Kind of the triggering event, `None` for eventless transitions
    pub event: Option<String>,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

impl<S: State> StateTransition<S> {
    pub fn is_eventless(&self) -> bool {
        self.event.is_none()
    }
}

/// Ordered history of state changes.
///
/// History is immutable: `record` returns a new history with the transition
/// appended.
///
/// # Example
///
/// ```rust
/// use statecraft::core::{StateHistory, StateTransition};
/// use statecraft::state_enum;
/// use chrono::Utc;
///
/// state_enum! {
///     enum Booking {
///         Editing,
///         Submitted,
///     }
///     final: [Submitted]
/// }
///
/// let history = StateHistory::new().record(StateTransition {
///     from: Booking::Editing,
///     to: Booking::Submitted,
///     event: Some("Submit".to_string()),
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.get_path(), vec![&Booking::Editing, &Booking::Submitted]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Append a transition in place, keeping at most `limit` entries.
    ///
    /// The oldest entries are evicted first, so the remaining path stays
    /// connected.
    pub fn push(&mut self, transition: StateTransition<S>, limit: Option<usize>) {
        self.transitions.push(transition);
        if let Some(limit) = limit {
            let excess = self.transitions.len().saturating_sub(limit);
            self.transitions.drain(..excess);
        }
    }

    /// States traversed: the first source, then every target in order.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Time between the first and last recorded transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
