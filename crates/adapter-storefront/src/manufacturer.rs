//! Manufacturer synchronization against the storefront.

use std::sync::Arc;

use serde_json::{Value as JsonValue, json};

use syncforge_bus::{Command, CommandHandler, CommandType, Outcome, RouteKey};
use syncforge_core::{ObjectType, ResourceApi, ResourceError, SyncError, SyncResult};
use syncforge_domain::Manufacturer;
use syncforge_identity::{Identity, IdentityCriteria, IdentityService};

use crate::adapter_name;

/// Maps a canonical manufacturer to storefront parameters.
///
/// Manufacturers carry no cross-references, so generation cannot fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManufacturerParamsGenerator;

impl ManufacturerParamsGenerator {
    pub fn generate(&self, manufacturer: &Manufacturer) -> JsonValue {
        json!({
            "name": manufacturer.name,
            "link": manufacturer.link,
            "image": manufacturer.logo_url,
        })
    }
}

fn source_criteria(manufacturer: &Manufacturer) -> IdentityCriteria {
    IdentityCriteria::source(
        adapter_name(),
        ObjectType::Manufacturer,
        manufacturer.identifier,
    )
}

/// CREATE handler: create-or-update.
///
/// A manufacturer that is already mapped degrades to an update in place - a
/// repeated CREATE never produces a duplicate target object. Losing the save
/// race against a concurrent run likewise degrades to an update of whichever
/// mapping won.
pub struct CreateManufacturerHandler {
    identity: IdentityService,
    resource: Arc<dyn ResourceApi>,
    params: ManufacturerParamsGenerator,
}

impl CreateManufacturerHandler {
    pub fn new(identity: IdentityService, resource: Arc<dyn ResourceApi>) -> Self {
        Self {
            identity,
            resource,
            params: ManufacturerParamsGenerator,
        }
    }

    fn create_fresh(&self, manufacturer: &Manufacturer, params: &JsonValue) -> SyncResult<Outcome> {
        let adapter_identifier = self.resource.create(params)?;
        let identity = Identity::new(
            adapter_name(),
            ObjectType::Manufacturer,
            manufacturer.identifier,
            adapter_identifier,
        );

        match self.identity.save(identity) {
            Ok(()) => Ok(Outcome::Applied),
            Err(err @ syncforge_identity::IdentityError::Conflict { .. }) => {
                // A concurrent create won the race for this triple; update
                // the target object its mapping points at instead.
                tracing::warn!(
                    object_identifier = %manufacturer.identifier,
                    error = %err,
                    "identity save conflicted; degrading to update"
                );
                let existing = self
                    .identity
                    .find_one_by(&source_criteria(manufacturer))?
                    .ok_or_else(|| {
                        SyncError::conflict("conflicting identity vanished before re-read")
                    })?;
                self.resource.update(&existing.adapter_identifier, params)?;
                Ok(Outcome::Applied)
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl CommandHandler for CreateManufacturerHandler {
    fn route(&self) -> RouteKey {
        RouteKey::new(adapter_name(), ObjectType::Manufacturer, CommandType::Create)
    }

    fn handle(&self, command: &Command) -> SyncResult<Outcome> {
        let manufacturer: Manufacturer = command.payload()?;
        let params = self.params.generate(&manufacturer);

        match self.identity.find_one_by(&source_criteria(&manufacturer))? {
            None => self.create_fresh(&manufacturer, &params),
            Some(identity) => match self.resource.update(&identity.adapter_identifier, &params) {
                Ok(()) => Ok(Outcome::Applied),
                Err(ResourceError::NotFound(_)) => {
                    // Stale mapping: the target object vanished underneath
                    // us. Drop the mapping and materialize a fresh object.
                    tracing::warn!(
                        identity = %identity,
                        "mapped target object is gone; recreating"
                    );
                    self.identity.remove(&identity)?;
                    self.create_fresh(&manufacturer, &params)
                }
                Err(err) => Err(err.into()),
            },
        }
    }
}

/// UPDATE handler: requires an existing mapping.
///
/// An UPDATE arriving before the corresponding CREATE is an ordering problem
/// upstream; it fails without creating anything. A stale mapping is
/// invalidated so the object is recreated on the next CREATE pass.
pub struct UpdateManufacturerHandler {
    identity: IdentityService,
    resource: Arc<dyn ResourceApi>,
    params: ManufacturerParamsGenerator,
}

impl UpdateManufacturerHandler {
    pub fn new(identity: IdentityService, resource: Arc<dyn ResourceApi>) -> Self {
        Self {
            identity,
            resource,
            params: ManufacturerParamsGenerator,
        }
    }
}

impl CommandHandler for UpdateManufacturerHandler {
    fn route(&self) -> RouteKey {
        RouteKey::new(adapter_name(), ObjectType::Manufacturer, CommandType::Update)
    }

    fn handle(&self, command: &Command) -> SyncResult<Outcome> {
        let manufacturer: Manufacturer = command.payload()?;

        let identity = self
            .identity
            .find_one_by(&source_criteria(&manufacturer))?
            .ok_or_else(|| {
                SyncError::mapping_not_found(ObjectType::Manufacturer, manufacturer.identifier)
            })?;

        let params = self.params.generate(&manufacturer);
        match self.resource.update(&identity.adapter_identifier, &params) {
            Ok(()) => Ok(Outcome::Applied),
            Err(ResourceError::NotFound(_)) => {
                tracing::warn!(
                    identity = %identity,
                    "mapped target object is gone; invalidating mapping"
                );
                self.identity.remove(&identity)?;
                Err(SyncError::mapping_not_found(
                    ObjectType::Manufacturer,
                    manufacturer.identifier,
                ))
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// REMOVE handler: idempotent delete.
///
/// No mapping means the goal state (no target object) already holds. A target
/// that reports the object missing on delete is likewise success-equivalent;
/// the identity is removed in both delete outcomes. Any other delete failure
/// leaves the identity intact so the removal is retried on the next pass.
pub struct RemoveManufacturerHandler {
    identity: IdentityService,
    resource: Arc<dyn ResourceApi>,
}

impl RemoveManufacturerHandler {
    pub fn new(identity: IdentityService, resource: Arc<dyn ResourceApi>) -> Self {
        Self { identity, resource }
    }
}

impl CommandHandler for RemoveManufacturerHandler {
    fn route(&self) -> RouteKey {
        RouteKey::new(adapter_name(), ObjectType::Manufacturer, CommandType::Remove)
    }

    fn handle(&self, command: &Command) -> SyncResult<Outcome> {
        let criteria = IdentityCriteria::source(
            adapter_name(),
            ObjectType::Manufacturer,
            command.object_identifier(),
        );

        let Some(identity) = self.identity.find_one_by(&criteria)? else {
            return Ok(Outcome::AlreadySatisfied);
        };

        match self.resource.delete(&identity.adapter_identifier) {
            Ok(()) => {}
            Err(ResourceError::NotFound(_)) => {
                tracing::info!(
                    identity = %identity,
                    "identity removed but the object was not found"
                );
            }
            Err(err) => return Err(err.into()),
        }

        self.identity.remove(&identity)?;
        Ok(Outcome::Applied)
    }
}
