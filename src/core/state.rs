//! State identifiers for machine definitions.
//!
//! A machine is always in exactly one state. States are plain values (usually
//! fieldless enums) that identify a node of the machine definition.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state identifiers.
///
/// All methods are pure. The definition stores one node per state value, so
/// states must be hashable; they must also be serializable so snapshots and
/// checkpoints can be persisted.
///
/// # Example
///
/// ```rust
/// use statecraft::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum BookingState {
///     Editing,
///     Submitted,
/// }
///
/// impl State for BookingState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Editing => "editing",
///             Self::Submitted => "submitted",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Submitted)
///     }
/// }
///
/// assert!(BookingState::Submitted.is_final());
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Whether the state is final by default.
    ///
    /// The machine builder marks a declared state final when this returns
    /// `true`; a definition can also mark any state final explicitly.
    fn is_final(&self) -> bool {
        false
    }
}
