//! Core machine vocabulary.
//!
//! This module contains the value types every definition and interpreter is
//! built from:
//! - State identifiers via the `State` trait
//! - Events via the `Event` trait, keyed by a payload-free kind
//! - Guards and actions over `(context, event)`
//! - Snapshots and immutable transition history
//!
//! Guards and assign actions are pure; exec actions are the only place a
//! transition can reach the outside world.

mod action;
mod event;
mod guard;
mod history;
mod snapshot;
mod state;

pub(crate) use action::apply_actions;
pub use action::Action;
pub use event::Event;
pub use guard::Guard;
pub use history::{StateHistory, StateTransition};
pub use snapshot::Snapshot;
pub use state::State;
