use serde::{Deserialize, Serialize};

use syncforge_core::{Attribute, ObjectIdentifier, ObjectType, TransferObject};

/// A shipment package attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub shipping_code: Option<String>,
    pub shipping_provider: Option<String>,
}

/// One order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub quantity: i64,
    /// Price in smallest currency unit (e.g., cents).
    pub unit_price: u64,
    /// Tax rate in basis points (1900 = 19.00%).
    pub tax_rate_bp: u32,
}

/// A sales order in canonical form.
///
/// Status fields are **references** (canonical identifiers of
/// [`OrderStatus`](crate::OrderStatus) / [`PaymentStatus`](crate::PaymentStatus)
/// objects), not inline values; the target-side identifiers are resolved
/// through the identity service when parameters are generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub identifier: ObjectIdentifier,
    pub order_number: String,
    pub order_status_identifier: ObjectIdentifier,
    pub payment_status_identifier: ObjectIdentifier,
    /// ISO country code of the shipping address, when known. Used for
    /// country-specific tax resolution.
    pub shipping_country: Option<String>,
    pub lines: Vec<OrderLine>,
    pub packages: Vec<Package>,
    pub attributes: Vec<Attribute>,
}

impl Order {
    /// The package whose tracking data is reported to the target system.
    /// Orders rarely carry more than one; the first wins.
    pub fn first_package(&self) -> Option<&Package> {
        self.packages.first()
    }
}

impl TransferObject for Order {
    const TYPE: ObjectType = ObjectType::Order;

    fn identifier(&self) -> ObjectIdentifier {
        self.identifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_package_is_none_for_unshipped_orders() {
        let order = Order {
            identifier: ObjectIdentifier::new(),
            order_number: "10001".to_string(),
            order_status_identifier: ObjectIdentifier::new(),
            payment_status_identifier: ObjectIdentifier::new(),
            shipping_country: None,
            lines: vec![],
            packages: vec![],
            attributes: vec![],
        };
        assert!(order.first_package().is_none());
    }
}
