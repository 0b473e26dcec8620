//! Events that drive transitions.

use std::fmt::Debug;
use std::hash::Hash;

/// Trait for events sent to an interpreter.
///
/// Transition tables are keyed by [`Event::Kind`], a payload-free
/// discriminant, so an event table can only name kinds that exist.
/// Fieldless event enums can use themselves as their kind.
///
/// # Example
///
/// ```rust
/// use statecraft::core::Event;
///
/// #[derive(Clone, Debug)]
/// enum TemperatureEvent {
///     Celsius(String),
///     Fahrenheit(String),
/// }
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum TemperatureEventKind {
///     Celsius,
///     Fahrenheit,
/// }
///
/// impl Event for TemperatureEvent {
///     type Kind = TemperatureEventKind;
///
///     fn kind(&self) -> Self::Kind {
///         match self {
///             Self::Celsius(_) => TemperatureEventKind::Celsius,
///             Self::Fahrenheit(_) => TemperatureEventKind::Fahrenheit,
///         }
///     }
/// }
///
/// let event = TemperatureEvent::Celsius("100".to_string());
/// assert_eq!(event.kind(), TemperatureEventKind::Celsius);
/// ```
pub trait Event: Clone + Debug + Send + 'static {
    /// Payload-free discriminant used as the transition table key.
    type Kind: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// The kind of this event.
    fn kind(&self) -> Self::Kind;
}
