//! Order materialization in the ERP.

use std::sync::Arc;

use serde_json::{Map, Value as JsonValue, json};

use syncforge_bus::{Command, CommandHandler, CommandType, Outcome, RouteKey};
use syncforge_core::{
    AdapterIdentifier, AttributePersister, ObjectType, ResourceApi, ResourceError, SyncError,
    SyncResult,
};
use syncforge_domain::Order;
use syncforge_identity::{Identity, IdentityCriteria, IdentityService};

use crate::adapter_name;

/// Resolves the ERP tax group for a line's rate, optionally narrowed by the
/// shipping country (country-specific tax rules take precedence).
pub trait TaxProvider: Send + Sync {
    fn tax_for(&self, rate_bp: u32, country: Option<&str>) -> Option<AdapterIdentifier>;
}

/// Maps a canonical order to ERP creation parameters.
///
/// Status references resolve best-effort: an unmapped order or payment status
/// is reported and the field omitted, because the order itself is still worth
/// materializing. Line taxes are different - the ERP rejects items without a
/// tax group, so an unresolvable tax fails generation.
pub struct OrderParamsGenerator {
    identity: IdentityService,
    taxes: Arc<dyn TaxProvider>,
}

impl OrderParamsGenerator {
    pub fn new(identity: IdentityService, taxes: Arc<dyn TaxProvider>) -> Self {
        Self { identity, taxes }
    }

    pub fn generate(&self, order: &Order) -> SyncResult<JsonValue> {
        let mut params = Map::new();
        params.insert("number".to_string(), json!(order.order_number));

        let order_status = self.identity.find_one_by(&IdentityCriteria::source(
            adapter_name(),
            ObjectType::OrderStatus,
            order.order_status_identifier,
        ))?;
        match order_status {
            Some(identity) => {
                params.insert(
                    "statusId".to_string(),
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

        let payment_status = self.identity.find_one_by(&IdentityCriteria::source(
            adapter_name(),
            ObjectType::PaymentStatus,
            order.payment_status_identifier,
        ))?;
        match payment_status {
            Some(identity) => {
                params.insert(
                    "paymentStatusId".to_string(),
                    json!(identity.adapter_identifier.as_str()),
                );
            }
            None => {
                tracing::warn!(
                    order = %order.identifier,
                    payment_status = %order.payment_status_identifier,
                    "payment status not mapped"
                );
            }
        }

        let country = order.shipping_country.as_deref();
        let mut items = Vec::with_capacity(order.lines.len());
        for line in &order.lines {
            let tax = self.taxes.tax_for(line.tax_rate_bp, country).ok_or_else(|| {
                SyncError::mapping_not_found(
                    ObjectType::Tax,
                    format!("rate {}bp for order {}", line.tax_rate_bp, order.identifier),
                )
            })?;
            items.push(json!({
                "name": line.name,
                "quantity": line.quantity,
                "price": line.unit_price,
                "taxId": tax.as_str(),
            }));
        }
        params.insert("items".to_string(), JsonValue::Array(items));

        Ok(JsonValue::Object(params))
    }
}

/// CREATE handler: materialize-or-update, attributes after the primary write.
pub struct CreateOrderHandler {
    identity: IdentityService,
    resource: Arc<dyn ResourceApi>,
    attributes: Arc<dyn AttributePersister>,
    params: OrderParamsGenerator,
}

impl CreateOrderHandler {
    pub fn new(
        identity: IdentityService,
        resource: Arc<dyn ResourceApi>,
        attributes: Arc<dyn AttributePersister>,
        taxes: Arc<dyn TaxProvider>,
    ) -> Self {
        let params = OrderParamsGenerator::new(identity.clone(), taxes);
        Self {
            identity,
            resource,
            attributes,
            params,
        }
    }

    fn source_criteria(order: &Order) -> IdentityCriteria {
        IdentityCriteria::source(adapter_name(), ObjectType::Order, order.identifier)
    }

    fn write(&self, order: &Order, params: &JsonValue) -> SyncResult<AdapterIdentifier> {
        match self.identity.find_one_by(&Self::source_criteria(order))? {
            Some(identity) => match self.resource.update(&identity.adapter_identifier, params) {
                Ok(()) => Ok(identity.adapter_identifier),
                Err(ResourceError::NotFound(_)) => {
                    tracing::warn!(
                        identity = %identity,
                        "mapped order is gone in the ERP; invalidating mapping"
                    );
                    self.identity.remove(&identity)?;
                    Err(SyncError::mapping_not_found(
                        ObjectType::Order,
                        order.identifier,
                    ))
                }
                Err(err) => Err(err.into()),
            },
            None => {
                let adapter_identifier = self.resource.create(params)?;
                let identity = Identity::new(
                    adapter_name(),
                    ObjectType::Order,
                    order.identifier,
                    adapter_identifier.clone(),
                );
                match self.identity.save(identity) {
                    Ok(()) => Ok(adapter_identifier),
                    Err(err @ syncforge_identity::IdentityError::Conflict { .. }) => {
                        tracing::warn!(
                            object_identifier = %order.identifier,
                            error = %err,
                            "identity save conflicted; degrading to update"
                        );
                        let existing = self
                            .identity
                            .find_one_by(&Self::source_criteria(order))?
                            .ok_or_else(|| {
                                SyncError::conflict("conflicting identity vanished before re-read")
                            })?;
                        self.resource.update(&existing.adapter_identifier, params)?;
                        Ok(existing.adapter_identifier)
                    }
                    Err(err) => Err(err.into()),
                }
            }
        }
    }
}

impl CommandHandler for CreateOrderHandler {
    fn route(&self) -> RouteKey {
        RouteKey::new(adapter_name(), ObjectType::Order, CommandType::Create)
    }

    fn handle(&self, command: &Command) -> SyncResult<Outcome> {
        let order: Order = command.payload()?;
        let params = self.params.generate(&order)?;

        let target = self.write(&order, &params)?;
        self.attributes.persist(&target, &order.attributes)?;

        Ok(Outcome::Applied)
    }
}
