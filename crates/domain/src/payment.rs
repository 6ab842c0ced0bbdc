use serde::{Deserialize, Serialize};

use syncforge_core::{ObjectIdentifier, ObjectType, TransferObject};

/// An incoming payment booked against an order.
///
/// `payment_method_identifier` and `currency_identifier` are canonical
/// references; both must be mapped on the target adapter before the payment
/// can be materialized there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub identifier: ObjectIdentifier,
    /// Amount in smallest currency unit (e.g., cents).
    pub amount: u64,
    pub currency_identifier: ObjectIdentifier,
    pub payment_method_identifier: ObjectIdentifier,
    pub transaction_reference: String,
    pub account_holder: String,
}

impl TransferObject for Payment {
    const TYPE: ObjectType = ObjectType::Payment;

    fn identifier(&self) -> ObjectIdentifier {
        self.identifier
    }
}
