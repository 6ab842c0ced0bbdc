//! Command handler contract and routing key.

use serde::{Deserialize, Serialize};

use syncforge_core::{AdapterName, ObjectType, SyncResult};

use crate::command::{Command, CommandType};

/// Dispatch routing key: what a handler serves, statically known.
///
/// Selection is decidable from the command envelope alone. A handler's key is
/// fixed at construction, which is what lets the dispatcher validate
/// uniqueness at registration time instead of probing `supports` predicates
/// per dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteKey {
    pub adapter_name: AdapterName,
    pub object_type: ObjectType,
    pub command_type: CommandType,
}

impl RouteKey {
    pub fn new(adapter_name: AdapterName, object_type: ObjectType, command_type: CommandType) -> Self {
        Self {
            adapter_name,
            object_type,
            command_type,
        }
    }
}

impl core::fmt::Display for RouteKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.adapter_name, self.object_type, self.command_type
        )
    }
}

/// What a successfully handled command did to the target system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A write was performed on the target system.
    Applied,
    /// The goal state already held; no write was issued (e.g. REMOVE with no
    /// existing mapping).
    AlreadySatisfied,
}

/// Performs exactly one synchronization effect against one target system for
/// one (object type, command type) combination.
///
/// Handlers receive all collaborators (identity service, resource API,
/// params generators, logger-free tracing) at construction; there is no
/// ambient lookup. They must be `Send + Sync` because commands for different
/// objects may be handled concurrently.
pub trait CommandHandler: Send + Sync {
    /// The unique routing key this handler serves.
    fn route(&self) -> RouteKey;

    /// Apply the command. Failures are local to this command.
    fn handle(&self, command: &Command) -> SyncResult<Outcome>;
}
