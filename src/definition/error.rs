//! Machine definition errors.

use stillwater::NonEmptyVec;
use thiserror::Error;

/// A single problem found while building a machine definition.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DefinitionError {
    #[error("Initial state '{state}' is not declared")]
    UnknownInitialState { state: String },

    #[error("Transition in {scope} targets undeclared state '{target}'")]
    UnknownTarget { scope: String, target: String },

    #[error("Guard '{name}' referenced in {scope} has no implementation")]
    UnknownGuard { scope: String, name: String },

    #[error("Action '{name}' referenced in {scope} has no implementation")]
    UnknownAction { scope: String, name: String },

    #[error("State '{state}' is declared more than once")]
    DuplicateState { state: String },

    #[error("Final state '{state}' cannot declare transitions or effects")]
    FinalStateHasTransitions { state: String },
}

/// Every problem found while building a definition.
///
/// Validation does not stop at the first error, so a definition with several
/// mistakes reports all of them at once.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("invalid machine definition: {}", render(.0))]
pub struct DefinitionErrors(Vec<DefinitionError>);

impl DefinitionErrors {
    pub fn errors(&self) -> &[DefinitionError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, error: &DefinitionError) -> bool {
        self.0.contains(error)
    }
}

impl From<NonEmptyVec<DefinitionError>> for DefinitionErrors {
    fn from(errors: NonEmptyVec<DefinitionError>) -> Self {
        Self(errors.iter().cloned().collect())
    }
}

fn render(errors: &[DefinitionError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
