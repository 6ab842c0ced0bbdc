//! The identity tuple and its partial-match filter.

use serde::{Deserialize, Serialize};

use syncforge_core::{AdapterIdentifier, AdapterName, ObjectIdentifier, ObjectType};

/// Durable cross-system reference.
///
/// At most one live identity exists per (adapter_name, object_type,
/// object_identifier) triple - the store enforces this. The reverse triple
/// (adapter_name, object_type, adapter_identifier) is unique in practice but
/// not enforced: a target object can briefly be pointed to by a stale record
/// pending cleanup.
///
/// Identities are never mutated in place; a changed mapping is a remove
/// followed by a fresh save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub adapter_name: AdapterName,
    pub object_type: ObjectType,
    pub object_identifier: ObjectIdentifier,
    pub adapter_identifier: AdapterIdentifier,
}

impl Identity {
    pub fn new(
        adapter_name: AdapterName,
        object_type: ObjectType,
        object_identifier: ObjectIdentifier,
        adapter_identifier: AdapterIdentifier,
    ) -> Self {
        Self {
            adapter_name,
            object_type,
            object_identifier,
            adapter_identifier,
        }
    }

    /// Whether this identity matches a partial filter (exactly the fields
    /// present in the criteria must be equal).
    pub fn matches(&self, criteria: &IdentityCriteria) -> bool {
        if let Some(adapter_name) = &criteria.adapter_name {
            if &self.adapter_name != adapter_name {
                return false;
            }
        }
        if let Some(object_type) = criteria.object_type {
            if self.object_type != object_type {
                return false;
            }
        }
        if let Some(object_identifier) = criteria.object_identifier {
            if self.object_identifier != object_identifier {
                return false;
            }
        }
        if let Some(adapter_identifier) = &criteria.adapter_identifier {
            if &self.adapter_identifier != adapter_identifier {
                return false;
            }
        }
        true
    }
}

impl core::fmt::Display for Identity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}/{}/{} -> {}",
            self.adapter_name, self.object_type, self.object_identifier, self.adapter_identifier
        )
    }
}

/// Partial-match filter over identity fields.
///
/// Built with the fluent setters; unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityCriteria {
    pub adapter_name: Option<AdapterName>,
    pub object_type: Option<ObjectType>,
    pub object_identifier: Option<ObjectIdentifier>,
    pub adapter_identifier: Option<AdapterIdentifier>,
}

impl IdentityCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter for the unique source-side triple. The common lookup every
    /// handler starts with.
    pub fn source(
        adapter_name: AdapterName,
        object_type: ObjectType,
        object_identifier: ObjectIdentifier,
    ) -> Self {
        Self::new()
            .adapter_name(adapter_name)
            .object_type(object_type)
            .object_identifier(object_identifier)
    }

    pub fn adapter_name(mut self, adapter_name: AdapterName) -> Self {
        self.adapter_name = Some(adapter_name);
        self
    }

    pub fn object_type(mut self, object_type: ObjectType) -> Self {
        self.object_type = Some(object_type);
        self
    }

    pub fn object_identifier(mut self, object_identifier: ObjectIdentifier) -> Self {
        self.object_identifier = Some(object_identifier);
        self
    }

    pub fn adapter_identifier(mut self, adapter_identifier: AdapterIdentifier) -> Self {
        self.adapter_identifier = Some(adapter_identifier);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Identity {
        Identity::new(
            AdapterName::from("storefront"),
            ObjectType::Manufacturer,
            ObjectIdentifier::new(),
            AdapterIdentifier::from("42"),
        )
    }

    #[test]
    fn empty_criteria_matches_everything() {
        assert!(sample().matches(&IdentityCriteria::new()));
    }

    #[test]
    fn source_criteria_matches_on_the_triple() {
        let identity = sample();
        let criteria = IdentityCriteria::source(
            identity.adapter_name.clone(),
            identity.object_type,
            identity.object_identifier,
        );
        assert!(identity.matches(&criteria));
    }

    #[test]
    fn mismatched_field_rejects() {
        let identity = sample();
        let criteria = IdentityCriteria::new().object_type(ObjectType::Order);
        assert!(!identity.matches(&criteria));

        let criteria = IdentityCriteria::new().adapter_identifier(AdapterIdentifier::from("43"));
        assert!(!identity.matches(&criteria));
    }

    #[test]
    fn reverse_lookup_by_adapter_identifier_matches() {
        let identity = sample();
        let criteria = IdentityCriteria::new()
            .adapter_name(identity.adapter_name.clone())
            .object_type(ObjectType::Manufacturer)
            .adapter_identifier(AdapterIdentifier::from("42"));
        assert!(identity.matches(&criteria));
    }
}
