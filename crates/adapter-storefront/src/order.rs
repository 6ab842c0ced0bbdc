//! Post-write order reconciliation against the storefront.
//!
//! Orders are materialized on the storefront by the shop itself; the
//! connector only reconciles them afterwards: tracking code from the first
//! package, shipping provider as a side-table attribute, and the current
//! order/payment status. Unmapped status references are reported and skipped
//! rather than failing the command - the rest of the reconciliation is still
//! worth applying.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value as JsonValue, json};

use syncforge_bus::{Command, CommandHandler, CommandType, Outcome, RouteKey};
use syncforge_core::{
    Attribute, AttributePersister, ObjectType, ResourceApi, ResourceError, SyncError, SyncResult,
};
use syncforge_domain::Order;
use syncforge_identity::{IdentityCriteria, IdentityService};

use crate::adapter_name;

/// Storefront payment state meaning "completely paid"; reaching it stamps the
/// cleared date on the order.
const PAYMENT_STATE_COMPLETELY_PAID: &str = "12";

/// Derives the storefront update parameters and side-table attributes for an
/// already-materialized order.
pub struct OrderReconciliationGenerator {
    identity: IdentityService,
}

impl OrderReconciliationGenerator {
    pub fn new(identity: IdentityService) -> Self {
        Self { identity }
    }

    pub fn generate(&self, order: &Order) -> SyncResult<(JsonValue, Vec<Attribute>)> {
        let mut params = Map::new();
        let mut attributes = order.attributes.clone();

        if let Some(package) = order.first_package() {
            if let Some(code) = &package.shipping_code {
                params.insert("trackingCode".to_string(), json!(code));
            }
            if let Some(provider) = &package.shipping_provider {
                attributes.push(Attribute::new("shippingProvider", provider));
            }
        }

        let order_status = self.identity.find_one_by(
            &IdentityCriteria::source(
                adapter_name(),
                ObjectType::OrderStatus,
                order.order_status_identifier,
            ),
        )?;
        match order_status {
            Some(identity) => {
                params.insert(
                    "orderStatusId".to_string(),
                    json!(identity.adapter_identifier.as_str()),
                );
            }
            None => {
                tracing::warn!(
                    order = %order.identifier,
                    order_status = %order.order_status_identifier,
                    "order status not mapped"
                );
            }
        }

        let payment_status = self.identity.find_one_by(
            &IdentityCriteria::source(
                adapter_name(),
                ObjectType::PaymentStatus,
                order.payment_status_identifier,
            ),
        )?;
        match payment_status {
            Some(identity) => {
                params.insert(
                    "paymentStatusId".to_string(),
                    json!(identity.adapter_identifier.as_str()),
                );
                if identity.adapter_identifier.as_str() == PAYMENT_STATE_COMPLETELY_PAID {
                    params.insert("clearedDate".to_string(), json!(Utc::now().to_rfc3339()));
                }
            }
            None => {
                tracing::warn!(
                    order = %order.identifier,
                    payment_status = %order.payment_status_identifier,
                    "payment status not mapped"
                );
            }
        }

        Ok((JsonValue::Object(params), attributes))
    }
}

/// HANDLE handler: reconcile an order that already exists on the storefront.
///
/// Requires an existing mapping - a HANDLE arriving before the order was ever
/// materialized signals an ordering problem upstream and fails so it can be
/// retried after the CREATE.
pub struct HandleOrderHandler {
    identity: IdentityService,
    resource: Arc<dyn ResourceApi>,
    attributes: Arc<dyn AttributePersister>,
    params: OrderReconciliationGenerator,
}

impl HandleOrderHandler {
    pub fn new(
        identity: IdentityService,
        resource: Arc<dyn ResourceApi>,
        attributes: Arc<dyn AttributePersister>,
    ) -> Self {
        let params = OrderReconciliationGenerator::new(identity.clone());
        Self {
            identity,
            resource,
            attributes,
            params,
        }
    }
}

impl CommandHandler for HandleOrderHandler {
    fn route(&self) -> RouteKey {
        RouteKey::new(adapter_name(), ObjectType::Order, CommandType::Handle)
    }

    fn handle(&self, command: &Command) -> SyncResult<Outcome> {
        let order: Order = command.payload()?;

        let identity = self
            .identity
            .find_one_by(&IdentityCriteria::source(
                adapter_name(),
                ObjectType::Order,
                order.identifier,
            ))?
            .ok_or_else(|| SyncError::mapping_not_found(ObjectType::Order, order.identifier))?;

        let (params, attributes) = self.params.generate(&order)?;

        match self.resource.update(&identity.adapter_identifier, &params) {
            Ok(()) => {}
            Err(ResourceError::NotFound(_)) => {
                tracing::warn!(
                    identity = %identity,
                    "mapped order is gone on the storefront; invalidating mapping"
                );
                self.identity.remove(&identity)?;
                return Err(SyncError::mapping_not_found(
                    ObjectType::Order,
                    order.identifier,
                ));
            }
            Err(err) => return Err(err.into()),
        }

        // Attributes go in only after the primary write succeeded, so they
        // are never orphaned against a non-existent order.
        self.attributes
            .persist(&identity.adapter_identifier, &attributes)?;

        Ok(Outcome::Applied)
    }
}
