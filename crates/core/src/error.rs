//! Synchronization error model.

use thiserror::Error;

use crate::id::AdapterIdentifier;
use crate::object::ObjectType;

/// Result type used across the synchronization layer.
pub type SyncResult<T> = Result<T, SyncError>;

/// Failure of a single command's handling.
///
/// Every variant here is **local to one command**: the run continues with the
/// next command and the identity store is left in a state where retrying is
/// safe. Configuration-level failures (missing handler, duplicate route) live
/// in the dispatcher's own error types because they abort the run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// A required cross-reference has no identity mapping yet. The command is
    /// expected to be retried once the missing mapping exists.
    #[error("mapping not found: {object_type} '{reference}'")]
    MappingNotFound {
        object_type: ObjectType,
        reference: String,
    },

    /// Identity uniqueness was violated on save (a concurrent create won).
    #[error("identity conflict: {0}")]
    Conflict(String),

    /// The mapped object no longer exists on the target system.
    #[error("target object not found: {0}")]
    TargetNotFound(AdapterIdentifier),

    /// Command payload missing, of the wrong type, or malformed.
    #[error("payload error: {0}")]
    Payload(String),

    /// An identifier failed to parse.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Durable mapping storage failed.
    #[error("identity storage error: {0}")]
    Storage(String),

    /// Target API unreachable or the write was rejected.
    #[error("transport error: {0}")]
    Transport(String),
}

impl SyncError {
    pub fn mapping_not_found(
        object_type: ObjectType,
        reference: impl core::fmt::Display,
    ) -> Self {
        Self::MappingNotFound {
            object_type,
            reference: reference.to_string(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn payload(msg: impl Into<String>) -> Self {
        Self::Payload(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}
