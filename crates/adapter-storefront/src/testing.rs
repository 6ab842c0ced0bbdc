//! Counting fakes for the target-system boundary, shared by this crate's tests.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde_json::Value as JsonValue;

use syncforge_core::{AdapterIdentifier, Attribute, AttributePersister, ResourceApi, ResourceError};
use syncforge_identity::{Identity, IdentityCriteria, IdentityError, IdentityStore, InMemoryIdentityStore};

/// A `ResourceApi` fake that records every call and hands out sequential ids.
#[derive(Default)]
pub(crate) struct RecordingResource {
    next_id: AtomicU64,
    created: Mutex<Vec<JsonValue>>,
    updated: Mutex<Vec<(AdapterIdentifier, JsonValue)>>,
    deleted: Mutex<Vec<AdapterIdentifier>>,
    missing: Mutex<HashSet<String>>,
    unavailable: AtomicBool,
}

impl RecordingResource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the given target id report `NotFound` on update/delete.
    pub fn mark_missing(&self, id: &str) {
        self.missing.lock().unwrap().insert(id.to_string());
    }

    pub fn set_unavailable(&self, value: bool) {
        self.unavailable.store(value, Ordering::SeqCst);
    }

    pub fn create_calls(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    pub fn update_calls(&self) -> usize {
        self.updated.lock().unwrap().len()
    }

    pub fn delete_calls(&self) -> usize {
        self.deleted.lock().unwrap().len()
    }

    pub fn last_update(&self) -> Option<(AdapterIdentifier, JsonValue)> {
        self.updated.lock().unwrap().last().cloned()
    }
}

impl ResourceApi for RecordingResource {
    fn create(&self, params: &JsonValue) -> Result<AdapterIdentifier, ResourceError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ResourceError::Unavailable("offline".to_string()));
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.created.lock().unwrap().push(params.clone());
        Ok(AdapterIdentifier::from(n.to_string()))
    }

    fn update(&self, id: &AdapterIdentifier, params: &JsonValue) -> Result<(), ResourceError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ResourceError::Unavailable("offline".to_string()));
        }
        if self.missing.lock().unwrap().contains(id.as_str()) {
            return Err(ResourceError::NotFound(id.clone()));
        }
        self.updated.lock().unwrap().push((id.clone(), params.clone()));
        Ok(())
    }

    fn delete(&self, id: &AdapterIdentifier) -> Result<(), ResourceError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ResourceError::Unavailable("offline".to_string()));
        }
        if self.missing.lock().unwrap().contains(id.as_str()) {
            return Err(ResourceError::NotFound(id.clone()));
        }
        self.deleted.lock().unwrap().push(id.clone());
        Ok(())
    }
}

/// An identity store whose first insert loses a save race: a concurrent
/// writer's mapping (pointing at `winner`) lands first and the insert
/// observes the conflict. Subsequent inserts go through normally.
pub(crate) struct ContestedStore {
    inner: InMemoryIdentityStore,
    winner: AdapterIdentifier,
    contested: AtomicBool,
}

impl ContestedStore {
    pub fn new(winner: &str) -> Self {
        Self {
            inner: InMemoryIdentityStore::new(),
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
        if self.contested.swap(false, Ordering::SeqCst) {
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
