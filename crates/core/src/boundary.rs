//! Target-system boundary contracts.
//!
//! The connector never talks to a remote platform directly; adapter handlers
//! write through these traits. Concrete implementations (HTTP clients with
//! their own timeouts and auth) live outside this workspace - in tests they
//! are replaced by counting fakes.

use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::attribute::Attribute;
use crate::error::SyncError;
use crate::id::AdapterIdentifier;

/// Target-system write API failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// The addressed object does not exist on the target system.
    ///
    /// For deletes this is success-equivalent (the goal state already holds);
    /// for updates it means the identity mapping went stale.
    #[error("object not found on target: {0}")]
    NotFound(AdapterIdentifier),

    /// The target rejected the write (validation, bad payload).
    #[error("write rejected by target: {0}")]
    Rejected(String),

    /// The target could not be reached (includes adapter-level timeouts; a
    /// timed-out write is treated as failed, never as assumed-successful).
    #[error("target unreachable: {0}")]
    Unavailable(String),
}

impl From<ResourceError> for SyncError {
    fn from(value: ResourceError) -> Self {
        match value {
            ResourceError::NotFound(id) => SyncError::TargetNotFound(id),
            ResourceError::Rejected(msg) => SyncError::Transport(format!("rejected: {msg}")),
            ResourceError::Unavailable(msg) => SyncError::Transport(msg),
        }
    }
}

/// Write API for one object type on one target system.
///
/// Parameters are the target-specific shape produced by a params generator;
/// handlers never assemble them field by field.
pub trait ResourceApi: Send + Sync {
    /// Create the object and return the identifier the target assigned.
    fn create(&self, params: &JsonValue) -> Result<AdapterIdentifier, ResourceError>;

    /// Update the object in place.
    fn update(&self, id: &AdapterIdentifier, params: &JsonValue) -> Result<(), ResourceError>;

    /// Delete the object.
    fn delete(&self, id: &AdapterIdentifier) -> Result<(), ResourceError>;
}

/// Persists side-table attributes against an existing target object.
pub trait AttributePersister: Send + Sync {
    fn persist(
        &self,
        target: &AdapterIdentifier,
        attributes: &[Attribute],
    ) -> Result<(), ResourceError>;
}
