//! Interpreter error types.

use thiserror::Error;

/// Errors surfaced by a running interpreter.
///
/// Unhandled events are not errors, and effect failures are reported as
/// warnings instead (see [`Interpreter::take_warnings`](crate::interpreter::Interpreter::take_warnings)).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InterpreterError {
    /// Eventless transitions kept firing past the configured bound.
    ///
    /// The interpreter stays in the state reached when the bound was hit.
    #[error("Eventless transitions did not settle in state '{state}' after {steps} steps")]
    NonTerminatingChain { state: String, steps: usize },

    #[error("Invalid interpreter options: {0}")]
    InvalidOptions(String),
}
