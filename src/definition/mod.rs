//! Machine definition model.
//!
//! A definition is the static half of a machine: states, the initial state
//! and context, per-state event tables, eventless lists, invoked effects,
//! global handlers and final markers. It is validated once when built and is
//! immutable afterwards.

mod error;
mod machine;
mod node;
mod transition;

pub use error::{DefinitionError, DefinitionErrors};
pub use machine::MachineDefinition;
pub(crate) use node::EventTable;
pub use node::StateNode;
pub use transition::TransitionDef;
