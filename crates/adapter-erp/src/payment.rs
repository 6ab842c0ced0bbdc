//! Payment synchronization against the ERP.

use std::sync::Arc;

use serde_json::{Value as JsonValue, json};

use syncforge_bus::{Command, CommandHandler, CommandType, Outcome, RouteKey};
use syncforge_core::{ObjectType, ResourceApi, ResourceError, SyncError, SyncResult};
use syncforge_domain::Payment;
use syncforge_identity::{Identity, IdentityCriteria, IdentityService};

use crate::adapter_name;

/// Maps a canonical payment to ERP booking parameters.
///
/// Payment method and currency are required cross-references: a payment
/// cannot be booked against the ERP until both are mapped, so an unmapped
/// reference fails generation with the reference named. The command is then
/// retried once the missing mapping exists.
pub struct PaymentParamsGenerator {
    identity: IdentityService,
}

impl PaymentParamsGenerator {
    pub fn new(identity: IdentityService) -> Self {
        Self { identity }
    }

    pub fn generate(&self, payment: &Payment) -> SyncResult<JsonValue> {
        let payment_method = self
            .identity
            .find_one_by(&IdentityCriteria::source(
                adapter_name(),
                ObjectType::PaymentMethod,
                payment.payment_method_identifier,
            ))?
            .ok_or_else(|| {
                SyncError::mapping_not_found(
                    ObjectType::PaymentMethod,
                    payment.payment_method_identifier,
                )
            })?;

        let currency = self
            .identity
            .find_one_by(&IdentityCriteria::source(
                adapter_name(),
                ObjectType::Currency,
                payment.currency_identifier,
            ))?
            .ok_or_else(|| {
                SyncError::mapping_not_found(ObjectType::Currency, payment.currency_identifier)
            })?;

        Ok(json!({
            "amount": payment.amount,
            "exchangeRatio": 1,
            "mopId": payment_method.adapter_identifier.as_str(),
            "currency": currency.adapter_identifier.as_str(),
            "type": "credit",
            "transactionType": 2,
            "status": 2,
            "properties": [
                { "typeId": 23, "value": 4 },
                { "typeId": 11, "value": payment.account_holder },
                { "typeId": 1, "value": payment.transaction_reference },
                { "typeId": 3, "value": payment.transaction_reference },
            ],
        }))
    }
}

/// CREATE handler: book-or-update.
///
/// Same lifecycle as every create handler: an already-mapped payment is
/// updated in place, and losing the identity save race degrades to updating
/// the winner's target object.
pub struct CreatePaymentHandler {
    identity: IdentityService,
    resource: Arc<dyn ResourceApi>,
    params: PaymentParamsGenerator,
}

impl CreatePaymentHandler {
    pub fn new(identity: IdentityService, resource: Arc<dyn ResourceApi>) -> Self {
        let params = PaymentParamsGenerator::new(identity.clone());
        Self {
            identity,
            resource,
            params,
        }
    }

    fn source_criteria(payment: &Payment) -> IdentityCriteria {
        IdentityCriteria::source(adapter_name(), ObjectType::Payment, payment.identifier)
    }
}

impl CommandHandler for CreatePaymentHandler {
    fn route(&self) -> RouteKey {
        RouteKey::new(adapter_name(), ObjectType::Payment, CommandType::Create)
    }

    fn handle(&self, command: &Command) -> SyncResult<Outcome> {
        let payment: Payment = command.payload()?;
        // Resolve references first: a payment with an unmapped method or
        // currency must fail before any target write happens.
        let params = self.params.generate(&payment)?;

        match self.identity.find_one_by(&Self::source_criteria(&payment))? {
            Some(identity) => match self.resource.update(&identity.adapter_identifier, &params) {
                Ok(()) => Ok(Outcome::Applied),
                Err(ResourceError::NotFound(_)) => {
                    tracing::warn!(
                        identity = %identity,
                        "booked payment is gone in the ERP; invalidating mapping"
                    );
                    self.identity.remove(&identity)?;
                    Err(SyncError::mapping_not_found(
                        ObjectType::Payment,
                        payment.identifier,
                    ))
                }
                Err(err) => Err(err.into()),
            },
            None => {
                let adapter_identifier = self.resource.create(&params)?;
                let identity = Identity::new(
                    adapter_name(),
                    ObjectType::Payment,
                    payment.identifier,
                    adapter_identifier,
                );
                match self.identity.save(identity) {
                    Ok(()) => Ok(Outcome::Applied),
                    Err(err @ syncforge_identity::IdentityError::Conflict { .. }) => {
                        tracing::warn!(
                            object_identifier = %payment.identifier,
                            error = %err,
                            "identity save conflicted; degrading to update"
                        );
                        let existing = self
                            .identity
                            .find_one_by(&Self::source_criteria(&payment))?
                            .ok_or_else(|| {
                                SyncError::conflict("conflicting identity vanished before re-read")
                            })?;
                        self.resource.update(&existing.adapter_identifier, &params)?;
                        Ok(Outcome::Applied)
                    }
                    Err(err) => Err(err.into()),
                }
            }
        }
    }
}
