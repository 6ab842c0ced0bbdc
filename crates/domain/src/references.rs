//! Reference objects: small entities other objects point at.
//!
//! These are synchronized once (usually at setup) and afterwards only looked
//! up through the identity service when orders and payments resolve their
//! cross-references.

use serde::{Deserialize, Serialize};

use syncforge_core::{ObjectIdentifier, ObjectType, TransferObject};

macro_rules! reference_object {
    ($(#[$doc:meta])* $t:ident, $ty:expr, $field:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $t {
            pub identifier: ObjectIdentifier,
            pub $field: String,
        }

        impl $t {
            pub fn new(identifier: ObjectIdentifier, $field: impl Into<String>) -> Self {
                Self {
                    identifier,
                    $field: $field.into(),
                }
            }
        }

        impl TransferObject for $t {
            const TYPE: ObjectType = $ty;

            fn identifier(&self) -> ObjectIdentifier {
                self.identifier
            }
        }
    };
}

reference_object!(
    /// A lifecycle status an order can be in ("open", "shipped", ...).
    OrderStatus,
    ObjectType::OrderStatus,
    name
);

reference_object!(
    /// A payment state an order can be in ("open", "completely paid", ...).
    PaymentStatus,
    ObjectType::PaymentStatus,
    name
);

reference_object!(
    /// A currency, identified by its ISO code.
    Currency,
    ObjectType::Currency,
    code
);

reference_object!(
    /// A method of payment ("prepayment", "invoice", ...).
    PaymentMethod,
    ObjectType::PaymentMethod,
    name
);
