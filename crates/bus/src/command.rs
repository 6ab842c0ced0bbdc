//! The command value: one synchronization intent for one object.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use syncforge_core::{
    AdapterName, ObjectIdentifier, ObjectType, SyncError, SyncResult, TransferObject,
};

use crate::handler::RouteKey;

/// Operation intent of a command.
///
/// `Handle` denotes a post-write reconciliation step (e.g. status/tracking
/// updates after an order already exists on the target), distinct from the
/// initial create/update.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    Create,
    Update,
    Remove,
    Handle,
}

impl CommandType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Create => "create",
            CommandType::Update => "update",
            CommandType::Remove => "remove",
            CommandType::Handle => "handle",
        }
    }
}

impl core::fmt::Display for CommandType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable synchronization instruction.
///
/// Commands represent **intent** - a request to materialize one change on one
/// adapter. They are transient: this core never persists them (an upstream
/// queue may).
///
/// The payload is carried as JSON: routing never needs to deserialize it,
/// and handlers pull it out typed via [`Command::payload`]. Constructing a command through
/// [`Command::carrying`] takes the object type and identifier from the
/// transfer object itself, so a payload of type `T` can never disagree with
/// the command's own type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    adapter_name: AdapterName,
    object_type: ObjectType,
    command_type: CommandType,
    object_identifier: ObjectIdentifier,
    payload: Option<JsonValue>,
}

impl Command {
    /// A payload-free command (a REMOVE knows only the identifier).
    pub fn new(
        adapter_name: AdapterName,
        command_type: CommandType,
        object_type: ObjectType,
        object_identifier: ObjectIdentifier,
    ) -> Self {
        Self {
            adapter_name,
            object_type,
            command_type,
            object_identifier,
            payload: None,
        }
    }

    /// A command carrying a transfer object as payload.
    pub fn carrying<T>(
        adapter_name: AdapterName,
        command_type: CommandType,
        object: &T,
    ) -> SyncResult<Self>
    where
        T: TransferObject + Serialize,
    {
        let payload = serde_json::to_value(object)
            .map_err(|e| SyncError::payload(format!("serializing {}: {e}", T::TYPE)))?;
        Ok(Self {
            adapter_name,
            object_type: T::TYPE,
            command_type,
            object_identifier: object.identifier(),
            payload: Some(payload),
        })
    }

    pub fn adapter_name(&self) -> &AdapterName {
        &self.adapter_name
    }

    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    pub fn command_type(&self) -> CommandType {
        self.command_type
    }

    pub fn object_identifier(&self) -> ObjectIdentifier {
        self.object_identifier
    }

    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    /// The dispatch routing key. Derived purely from the envelope fields -
    /// selection never inspects the payload.
    pub fn route(&self) -> RouteKey {
        RouteKey::new(self.adapter_name.clone(), self.object_type, self.command_type)
    }

    /// Deserialize the payload as `T`.
    ///
    /// Fails if the command carries no payload, if `T::TYPE` disagrees with
    /// the command's object type, or if the JSON does not fit `T`.
    pub fn payload<T>(&self) -> SyncResult<T>
    where
        T: TransferObject + DeserializeOwned,
    {
        if self.object_type != T::TYPE {
            return Err(SyncError::payload(format!(
                "command is tagged '{}' but payload '{}' was requested",
                self.object_type,
                T::TYPE
            )));
        }

        let payload = self
            .payload
            .as_ref()
            .ok_or_else(|| SyncError::payload("command carries no payload"))?;

        serde_json::from_value(payload.clone())
            .map_err(|e| SyncError::payload(format!("deserializing {}: {e}", T::TYPE)))
    }
}
