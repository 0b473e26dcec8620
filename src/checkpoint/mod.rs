//! Checkpoint and resume functionality for interpreters.
//!
//! A checkpoint captures where a running interpreter is (state, context and
//! history) so it can be persisted and resumed after a restart. Definitions
//! are never serialized: guards, actions and effects are code, so resuming
//! needs the same [`MachineDefinition`] the checkpoint was taken from.

use crate::core::{Event, Snapshot, State, StateHistory};
use crate::definition::MachineDefinition;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable checkpoint of a running interpreter.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(serialize = "C: Serialize", deserialize = "C: DeserializeOwned"))]
pub struct Checkpoint<S: State, C> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Id of the machine definition
    pub machine: String,

    /// Current state of the machine
    pub state: S,

    /// Current context
    pub context: Arc<C>,

    /// Transition history up to the checkpoint
    pub history: StateHistory<S>,
}

impl<S: State, C> Checkpoint<S, C> {
    pub(crate) fn capture(
        machine: &str,
        snapshot: &Snapshot<S, C>,
        history: &StateHistory<S>,
    ) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            machine: machine.to_string(),
            state: snapshot.state().clone(),
            context: Arc::clone(snapshot.shared_context()),
            history: history.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, CheckpointError>
    where
        C: Serialize,
    {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Parse a JSON checkpoint, rejecting unsupported versions.
    pub fn from_json(json: &str) -> Result<Self, CheckpointError>
    where
        C: DeserializeOwned,
    {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError>
    where
        C: Serialize,
    {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Decode a binary checkpoint, rejecting unsupported versions.
    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError>
    where
        C: DeserializeOwned,
    {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    /// Check that this checkpoint can resume `definition`.
    pub fn validate<E: Event>(
        &self,
        definition: &MachineDefinition<S, C, E>,
    ) -> Result<(), CheckpointError> {
        self.check_version()?;
        if self.machine != definition.id() {
            return Err(CheckpointError::MachineMismatch {
                expected: definition.id().to_string(),
                found: self.machine.clone(),
            });
        }
        if !definition.contains(&self.state) {
            return Err(CheckpointError::UnknownState(self.state.name().to_string()));
        }
        Ok(())
    }

    fn check_version(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(())
    }
}
