//! Identity store abstraction and the in-memory implementation.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::RwLock;

use thiserror::Error;

use syncforge_core::{AdapterName, ObjectIdentifier, ObjectType, SyncError};

use crate::identity::{Identity, IdentityCriteria};

/// Identity store operation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The (adapter_name, object_type, object_identifier) triple is already
    /// mapped. Callers degrade to update semantics after re-reading.
    #[error("identity already mapped: {adapter_name}/{object_type}/{object_identifier}")]
    Conflict {
        adapter_name: AdapterName,
        object_type: ObjectType,
        object_identifier: ObjectIdentifier,
    },

    /// The underlying storage failed.
    #[error("identity storage error: {0}")]
    Storage(String),
}

impl From<IdentityError> for SyncError {
    fn from(value: IdentityError) -> Self {
        match &value {
            IdentityError::Conflict { .. } => SyncError::Conflict(value.to_string()),
            IdentityError::Storage(msg) => SyncError::Storage(msg.clone()),
        }
    }
}

/// Durable storage of identity tuples, queryable by any subset of fields.
///
/// Implementations must serialize conflicting writes: of two concurrent
/// inserts for the same source triple exactly one succeeds, the other
/// observes [`IdentityError::Conflict`].
pub trait IdentityStore: Send + Sync {
    /// All identities matching the filter.
    fn find(&self, criteria: &IdentityCriteria) -> Result<Vec<Identity>, IdentityError>;

    /// Persist a new mapping. Fails with [`IdentityError::Conflict`] if the
    /// source triple is already mapped.
    fn insert(&self, identity: Identity) -> Result<(), IdentityError>;

    /// Delete a mapping. Returns whether a row was actually removed;
    /// removing an absent identity is not an error.
    fn remove(&self, identity: &Identity) -> Result<bool, IdentityError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MappingKey {
    adapter_name: AdapterName,
    object_type: ObjectType,
    object_identifier: ObjectIdentifier,
}

impl MappingKey {
    fn of(identity: &Identity) -> Self {
        Self {
            adapter_name: identity.adapter_name.clone(),
            object_type: identity.object_type,
            object_identifier: identity.object_identifier,
        }
    }
}

/// In-memory identity store.
///
/// Intended for tests/dev. The map is keyed by the source triple, so the
/// uniqueness invariant is structural rather than checked per write.
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    rows: RwLock<HashMap<MappingKey, Identity>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IdentityStore for InMemoryIdentityStore {
    fn find(&self, criteria: &IdentityCriteria) -> Result<Vec<Identity>, IdentityError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| IdentityError::Storage("lock poisoned".to_string()))?;

        Ok(rows
            .values()
            .filter(|identity| identity.matches(criteria))
            .cloned()
            .collect())
    }

    fn insert(&self, identity: Identity) -> Result<(), IdentityError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| IdentityError::Storage("lock poisoned".to_string()))?;

        match rows.entry(MappingKey::of(&identity)) {
            Entry::Occupied(_) => Err(IdentityError::Conflict {
                adapter_name: identity.adapter_name,
                object_type: identity.object_type,
                object_identifier: identity.object_identifier,
            }),
            Entry::Vacant(slot) => {
                slot.insert(identity);
                Ok(())
            }
        }
    }

    fn remove(&self, identity: &Identity) -> Result<bool, IdentityError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| IdentityError::Storage("lock poisoned".to_string()))?;

        Ok(rows.remove(&MappingKey::of(identity)).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syncforge_core::AdapterIdentifier;

    fn identity(object_identifier: ObjectIdentifier, adapter_identifier: &str) -> Identity {
        Identity::new(
            AdapterName::from("storefront"),
            ObjectType::Manufacturer,
            object_identifier,
            AdapterIdentifier::from(adapter_identifier),
        )
    }

    #[test]
    fn insert_then_find_by_source_triple() {
        let store = InMemoryIdentityStore::new();
        let id = ObjectIdentifier::new();
        store.insert(identity(id, "7")).unwrap();

        let found = store
            .find(&IdentityCriteria::source(
                AdapterName::from("storefront"),
                ObjectType::Manufacturer,
                id,
            ))
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].adapter_identifier.as_str(), "7");
    }

    #[test]
    fn second_insert_for_same_triple_conflicts() {
        let store = InMemoryIdentityStore::new();
        let id = ObjectIdentifier::new();
        store.insert(identity(id, "7")).unwrap();

        let err = store.insert(identity(id, "8")).unwrap_err();
        assert!(matches!(err, IdentityError::Conflict { .. }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let store = InMemoryIdentityStore::new();
        let row = identity(ObjectIdentifier::new(), "7");
        store.insert(row.clone()).unwrap();

        assert!(store.remove(&row).unwrap());
        assert!(!store.remove(&row).unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn same_object_maps_independently_per_adapter() {
        let store = InMemoryIdentityStore::new();
        let id = ObjectIdentifier::new();
        store.insert(identity(id, "7")).unwrap();

        let other = Identity::new(
            AdapterName::from("erp"),
            ObjectType::Manufacturer,
            id,
            AdapterIdentifier::from("900"),
        );
        store.insert(other).unwrap();
        assert_eq!(store.len(), 2);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Insert(u8, String),
            Remove(u8),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                (any::<u8>(), "[0-9]{1,4}").prop_map(|(k, v)| Op::Insert(k, v)),
                any::<u8>().prop_map(Op::Remove),
            ]
        }

        proptest! {
            /// Property: any interleaving of inserts and removes leaves at
            /// most one identity per source triple, and a remove always
            /// clears the triple.
            #[test]
            fn at_most_one_mapping_per_triple(ops in proptest::collection::vec(op_strategy(), 1..40)) {
                let store = InMemoryIdentityStore::new();
                // Fixed pool of object identifiers so operations collide.
                let pool: Vec<ObjectIdentifier> =
                    (0..8).map(|_| ObjectIdentifier::new()).collect();

                for op in ops {
                    match op {
                        Op::Insert(k, v) => {
                            let id = pool[(k as usize) % pool.len()];
                            let _ = store.insert(identity(id, &v));
                        }
                        Op::Remove(k) => {
                            let id = pool[(k as usize) % pool.len()];
                            let row = identity(id, "ignored");
                            let _ = store.remove(&row);
                        }
                    }

                    for id in &pool {
                        let found = store
                            .find(&IdentityCriteria::source(
                                AdapterName::from("storefront"),
                                ObjectType::Manufacturer,
                                *id,
                            ))
                            .unwrap();
                        prop_assert!(found.len() <= 1);
                    }
                }
            }
        }
    }
}
