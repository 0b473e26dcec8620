//! Invoked effects: long-lived processes bound to a state's lifetime.
//!
//! An effect is started when its state is entered and stopped when the state
//! is exited, the interpreter is stopped, or its handle is dropped. Effects
//! never touch interpreter state; they communicate by queueing events through
//! an [`EventSender`].
//!
//! # Key Concepts
//!
//! - **Invoke**: per-state descriptor holding the effect factory
//! - **EffectHandle**: running instance; cleanup runs exactly once
//! - **EventSender**: channel into the interpreter inbox, tagged with the
//!   effect generation so events from stopped effects can be discarded

mod interval;
mod invoke;
mod sender;

pub use interval::interval;
pub use invoke::{EffectError, EffectHandle, Invoke};
pub use sender::{Envelope, EventSender, Origin};
