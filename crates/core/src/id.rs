//! Strongly-typed identifiers used across the connector.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SyncError;

/// Identifier of an object in the canonical (source) domain.
///
/// Every synchronized business object carries exactly one of these; adapters
/// never see each other's native identifiers directly, only this one plus the
/// identity mapping.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectIdentifier(Uuid);

impl ObjectIdentifier {
    /// Create a new identifier.
    ///
    /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
    /// for determinism.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ObjectIdentifier {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for ObjectIdentifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for ObjectIdentifier {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<ObjectIdentifier> for Uuid {
    fn from(value: ObjectIdentifier) -> Self {
        value.0
    }
}

impl FromStr for ObjectIdentifier {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::from_str(s)
            .map_err(|e| SyncError::InvalidIdentifier(format!("ObjectIdentifier: {e}")))?;
        Ok(Self(uuid))
    }
}

macro_rules! impl_string_newtype {
    ($t:ty) => {
        impl $t {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }
    };
}

/// Name of one side of the synchronization (a target commerce platform).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdapterName(String);

/// Identifier assigned to an object by a target platform.
///
/// Opaque to the connector: target systems hand out numeric ids, string keys,
/// or composite handles, so this stays a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdapterIdentifier(String);

impl_string_newtype!(AdapterName);
impl_string_newtype!(AdapterIdentifier);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_identifier_round_trips_through_display_and_from_str() {
        let id = ObjectIdentifier::new();
        let parsed: ObjectIdentifier = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn object_identifier_rejects_garbage() {
        let err = "not-a-uuid".parse::<ObjectIdentifier>().unwrap_err();
        assert!(matches!(err, SyncError::InvalidIdentifier(_)));
    }

    #[test]
    fn adapter_name_preserves_value() {
        let name = AdapterName::from("storefront");
        assert_eq!(name.as_str(), "storefront");
        assert_eq!(name.to_string(), "storefront");
    }
}
