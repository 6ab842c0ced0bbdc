//! Counting fakes for the ERP boundary, shared by this crate's tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde_json::Value as JsonValue;

use syncforge_core::{
    AdapterIdentifier, Attribute, AttributePersister, ObjectType, ResourceApi, ResourceError,
};
use syncforge_identity::{Identity, IdentityCriteria, IdentityError, IdentityStore, InMemoryIdentityStore};

use crate::order::TaxProvider;

/// A `ResourceApi` fake that records calls and hands out sequential ids.
#[derive(Default)]
pub(crate) struct RecordingResource {
    next_id: AtomicU64,
    created: Mutex<Vec<JsonValue>>,
    updated: Mutex<Vec<(AdapterIdentifier, JsonValue)>>,
}

impl RecordingResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_calls(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    pub fn update_calls(&self) -> usize {
        self.updated.lock().unwrap().len()
    }

    pub fn last_create(&self) -> Option<JsonValue> {
        self.created.lock().unwrap().last().cloned()
    }

    pub fn last_update(&self) -> Option<(AdapterIdentifier, JsonValue)> {
        self.updated.lock().unwrap().last().cloned()
    }
}

impl ResourceApi for RecordingResource {
    fn create(&self, params: &JsonValue) -> Result<AdapterIdentifier, ResourceError> {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.created.lock().unwrap().push(params.clone());
        Ok(AdapterIdentifier::from(n.to_string()))
    }

    fn update(&self, id: &AdapterIdentifier, params: &JsonValue) -> Result<(), ResourceError> {
        self.updated.lock().unwrap().push((id.clone(), params.clone()));
        Ok(())
    }

    fn delete(&self, _id: &AdapterIdentifier) -> Result<(), ResourceError> {
        Ok(())
    }
}

/// An `AttributePersister` fake that records persisted attribute sets.
#[derive(Default)]
pub(crate) struct RecordingAttributePersister {
    persisted: Mutex<Vec<(AdapterIdentifier, Vec<Attribute>)>>,
}

impl RecordingAttributePersister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn persisted(&self) -> Vec<(AdapterIdentifier, Vec<Attribute>)> {
        self.persisted.lock().unwrap().clone()
    }
}

impl AttributePersister for RecordingAttributePersister {
    fn persist(
        &self,
        target: &AdapterIdentifier,
        attributes: &[Attribute],
    ) -> Result<(), ResourceError> {
        self.persisted
            .lock()
            .unwrap()
            .push((target.clone(), attributes.to_vec()));
        Ok(())
    }
}

/// An identity store whose first insert of the contested object type loses a
/// save race: a concurrent writer's mapping (pointing at `winner`) lands
/// first and the insert observes the conflict. Everything else, including
/// reference mappings set up beforehand, goes through normally.
pub(crate) struct ContestedStore {
    inner: InMemoryIdentityStore,
    contest: ObjectType,
    winner: AdapterIdentifier,
    contested: AtomicBool,
}

impl ContestedStore {
    pub fn new(contest: ObjectType, winner: &str) -> Self {
        Self {
            inner: InMemoryIdentityStore::new(),
            contest,
            winner: AdapterIdentifier::from(winner),
            contested: AtomicBool::new(true),
        }
    }
}

impl IdentityStore for ContestedStore {
    fn find(&self, criteria: &IdentityCriteria) -> Result<Vec<Identity>, IdentityError> {
        self.inner.find(criteria)
    }

    fn insert(&self, identity: Identity) -> Result<(), IdentityError> {
        if identity.object_type == self.contest && self.contested.swap(false, Ordering::SeqCst) {
            self.inner.insert(Identity::new(
                identity.adapter_name.clone(),
                identity.object_type,
                identity.object_identifier,
                self.winner.clone(),
            ))?;
            return Err(IdentityError::Conflict {
                adapter_name: identity.adapter_name,
                object_type: identity.object_type,
                object_identifier: identity.object_identifier,
            });
        }
        self.inner.insert(identity)
    }

    fn remove(&self, identity: &Identity) -> Result<bool, IdentityError> {
        self.inner.remove(identity)
    }
}

/// A `TaxProvider` backed by a fixed rate table, ignoring the country.
pub(crate) struct FixedTaxProvider {
    by_rate: HashMap<u32, AdapterIdentifier>,
}

impl FixedTaxProvider {
    pub fn empty() -> Self {
        Self {
            by_rate: HashMap::new(),
        }
    }

    pub fn with_rate(rate_bp: u32, target: &str) -> Self {
        let mut by_rate = HashMap::new();
        by_rate.insert(rate_bp, AdapterIdentifier::from(target));
        Self { by_rate }
    }
}

impl TaxProvider for FixedTaxProvider {
    fn tax_for(&self, rate_bp: u32, _country: Option<&str>) -> Option<AdapterIdentifier> {
        self.by_rate.get(&rate_bp).cloned()
    }
}
