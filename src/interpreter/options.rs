//! Interpreter configuration.

use crate::interpreter::error::InterpreterError;
use serde::{Deserialize, Serialize};

/// Runtime options for an [`Interpreter`](crate::interpreter::Interpreter).
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```rust
/// use statecraft::interpreter::InterpreterOptions;
///
/// let options = InterpreterOptions::from_json(r#"{ "defer_events": false }"#).unwrap();
/// assert!(!options.defer_events);
/// assert_eq!(options.max_eventless_steps, 100);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterOptions {
    /// Upper bound on eventless transitions taken in one macrostep.
    pub max_eventless_steps: usize,

    /// Queue events sent before `start()` instead of dropping them.
    pub defer_events: bool,

    /// Record entered states in the transition history.
    pub record_history: bool,

    /// Keep only the most recent transitions. `None` keeps them all.
    pub history_limit: Option<usize>,
}

impl Default for InterpreterOptions {
    fn default() -> Self {
        Self {
            max_eventless_steps: 100,
            defer_events: true,
            record_history: true,
            history_limit: None,
        }
    }
}

impl InterpreterOptions {
    pub fn from_json(json: &str) -> Result<Self, InterpreterError> {
        serde_json::from_str(json).map_err(|e| InterpreterError::InvalidOptions(e.to_string()))
    }

    pub fn max_eventless_steps(mut self, steps: usize) -> Self {
        self.max_eventless_steps = steps;
        self
    }

    pub fn defer_events(mut self, defer: bool) -> Self {
        self.defer_events = defer;
        self
    }

    pub fn record_history(mut self, record: bool) -> Self {
        self.record_history = record;
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }
}
