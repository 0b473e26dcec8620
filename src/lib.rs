//! Statecraft: a finite-state-machine interpreter
//!
//! Statecraft separates a machine's static description from its live
//! execution. A [`MachineDefinition`] is built once, validated up front and
//! never changes; an [`Interpreter`] runs it, resolving events to completion,
//! starting and stopping the effects bound to each state and notifying
//! observers with immutable snapshots.
//!
//! # Core Concepts
//!
//! - **State**: Type-safe state identifiers via the `State` trait
//! - **Event**: Events with a payload-free kind used for dispatch
//! - **Guards**: Pure predicates over `(context, event)` that enable transitions
//! - **Actions**: Context updates (`assign`) and external effects (`exec`)
//! - **Eventless transitions**: Checked after every step until nothing fires
//! - **Invoked effects**: Long-lived processes tied to a state's lifetime
//!
//! # Example
//!
//! ```rust
//! use statecraft::builder::{MachineBuilder, TransitionBuilder};
//! use statecraft::core::Event;
//! use statecraft::interpreter::Interpreter;
//! use statecraft::state_enum;
//!
//! state_enum! {
//!     enum CounterState {
//!         Active,
//!     }
//! }
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum CounterEvent {
//!     Increment,
//!     Decrement,
//! }
//!
//! impl Event for CounterEvent {
//!     type Kind = Self;
//!
//!     fn kind(&self) -> Self {
//!         *self
//!     }
//! }
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Counter {
//!     count: u32,
//! }
//!
//! let definition = MachineBuilder::new(CounterState::Active, Counter { count: 0 })
//!     .state(CounterState::Active, |s| {
//!         s.on(
//!             CounterEvent::Increment,
//!             TransitionBuilder::new()
//!                 .when(|ctx: &Counter, _| ctx.count < 10)
//!                 .assign(|ctx: &Counter, _| Counter { count: ctx.count + 1 }),
//!         )
//!         .on(
//!             CounterEvent::Decrement,
//!             TransitionBuilder::new()
//!                 .when(|ctx: &Counter, _| ctx.count > 0)
//!                 .assign(|ctx: &Counter, _| Counter { count: ctx.count - 1 }),
//!         )
//!     })
//!     .build()
//!     .unwrap();
//!
//! let mut counter = Interpreter::new(definition);
//! counter.start().unwrap();
//! counter.send(CounterEvent::Decrement).unwrap();
//! counter.send(CounterEvent::Increment).unwrap();
//!
//! assert_eq!(counter.context().count, 1);
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod definition;
pub mod effects;
pub mod interpreter;

// Re-export commonly used types
pub use builder::{goto, guarded, Implementations, MachineBuilder, StateBuilder, TransitionBuilder};
pub use checkpoint::{Checkpoint, CheckpointError};
pub use core::{Action, Event, Guard, Snapshot, State, StateHistory, StateTransition};
pub use definition::{DefinitionError, DefinitionErrors, MachineDefinition};
pub use effects::{EffectError, EffectHandle, EventSender, Invoke};
pub use interpreter::{Interpreter, InterpreterError, InterpreterOptions, InterpreterStatus, SubscriptionId};
