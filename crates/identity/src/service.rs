//! Query/insert/remove façade over the identity store.

use std::sync::Arc;

use syncforge_core::{AdapterName, ObjectIdentifier, ObjectType};

use crate::identity::{Identity, IdentityCriteria};
use crate::store::{IdentityError, IdentityStore};

/// The only component that touches mapping state.
///
/// Handlers and params generators hold a clone of this service; nothing else
/// reads or writes identities. All operations go straight to the store - no
/// caching across calls, so repeated lookups within one command may observe
/// concurrent changes.
#[derive(Clone)]
pub struct IdentityService {
    store: Arc<dyn IdentityStore>,
}

impl IdentityService {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    /// The identity matching the filter, or `None` - an explicit not-found,
    /// never a silent default.
    pub fn find_one_by(
        &self,
        criteria: &IdentityCriteria,
    ) -> Result<Option<Identity>, IdentityError> {
        Ok(self.store.find(criteria)?.into_iter().next())
    }

    /// Shorthand for the source-triple lookup every handler starts with.
    pub fn resolve(
        &self,
        adapter_name: AdapterName,
        object_type: ObjectType,
        object_identifier: ObjectIdentifier,
    ) -> Result<Option<Identity>, IdentityError> {
        self.find_one_by(&IdentityCriteria::source(
            adapter_name,
            object_type,
            object_identifier,
        ))
    }

    /// Persist a new mapping; [`IdentityError::Conflict`] if the source
    /// triple is already mapped.
    pub fn save(&self, identity: Identity) -> Result<(), IdentityError> {
        tracing::debug!(identity = %identity, "saving identity mapping");
        self.store.insert(identity)
    }

    /// Delete a mapping. Idempotent: removing an already-absent identity
    /// succeeds with no effect.
    pub fn remove(&self, identity: &Identity) -> Result<(), IdentityError> {
        let removed = self.store.remove(identity)?;
        if !removed {
            tracing::debug!(identity = %identity, "identity was already absent");
        }
        Ok(())
    }
}
