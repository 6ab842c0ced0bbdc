//! Side-table attribute value object.

use serde::{Deserialize, Serialize};

/// A free-form key/value attribute attached to a synchronized object.
///
/// Attributes cover target-system fields that are not modeled first-class on
/// the transfer objects (e.g. a shipping provider on an order). They are
/// persisted through an [`AttributePersister`](crate::AttributePersister)
/// keyed by the target object's adapter identifier, always **after** the
/// primary write so they are never orphaned against a missing object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
