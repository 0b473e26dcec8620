//! Live interpreters for machine definitions.
//!
//! An [`Interpreter`] turns a [`MachineDefinition`](crate::definition::MachineDefinition)
//! into an observable service: callers `send` events, subscribers receive a
//! settled [`Snapshot`](crate::core::Snapshot) per resolved event, and
//! invoked effects are started and stopped as states are entered and exited.
//!
//! # Key Concepts
//!
//! - **Run-to-completion**: events are queued and resolved one at a time,
//!   including the eventless transitions they trigger
//! - **Lifecycle**: `start` enters the initial state, `stop` releases effects
//!   and observers and makes the interpreter inert
//! - **Options**: [`InterpreterOptions`] bound eventless chains, control
//!   deferral of early events and history recording

mod error;
mod options;
mod service;
mod subscription;

pub use error::InterpreterError;
pub use options::InterpreterOptions;
pub use service::{Interpreter, InterpreterStatus};
pub use subscription::SubscriptionId;
