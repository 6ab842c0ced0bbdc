//! The closed set of synchronized object types and the transfer-object contract.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::id::ObjectIdentifier;

/// Domain type tag for every object the connector synchronizes.
///
/// Kept closed on purpose: dispatch routing is keyed by this enum (together
/// with adapter name and command type), so adding an object type is a source
/// change, never a runtime registration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Currency,
    Manufacturer,
    Order,
    OrderStatus,
    Payment,
    PaymentMethod,
    PaymentStatus,
    Tax,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Currency => "currency",
            ObjectType::Manufacturer => "manufacturer",
            ObjectType::Order => "order",
            ObjectType::OrderStatus => "order_status",
            ObjectType::Payment => "payment",
            ObjectType::PaymentMethod => "payment_method",
            ObjectType::PaymentStatus => "payment_status",
            ObjectType::Tax => "tax",
        }
    }
}

impl core::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "currency" => Ok(ObjectType::Currency),
            "manufacturer" => Ok(ObjectType::Manufacturer),
            "order" => Ok(ObjectType::Order),
            "order_status" => Ok(ObjectType::OrderStatus),
            "payment" => Ok(ObjectType::Payment),
            "payment_method" => Ok(ObjectType::PaymentMethod),
            "payment_status" => Ok(ObjectType::PaymentStatus),
            "tax" => Ok(ObjectType::Tax),
            other => Err(SyncError::InvalidIdentifier(format!(
                "ObjectType: unknown tag '{other}'"
            ))),
        }
    }
}

/// A business entity in canonical form, exchanged between adapters.
///
/// Transfer objects are **immutable by convention** - handlers read them and
/// derive target-system parameters, but never mutate or persist them (the
/// connector does not own their lifecycle).
///
/// ## Design Constraints
///
/// Transfer objects must be:
/// - **Cloneable**: objects may be copied into commands, logs, retries
/// - **Send + Sync + 'static**: commands cross thread boundaries
///
/// The associated `TYPE` ties a payload to its [`ObjectType`] tag so a command
/// carrying a payload of type `T` can never disagree with its own type field.
pub trait TransferObject: Clone + core::fmt::Debug + Send + Sync + 'static {
    const TYPE: ObjectType;

    /// The canonical identifier of this object.
    fn identifier(&self) -> ObjectIdentifier;
}
