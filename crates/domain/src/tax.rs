use serde::{Deserialize, Serialize};

use syncforge_core::{ObjectIdentifier, ObjectType, TransferObject};

/// A tax group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tax {
    pub identifier: ObjectIdentifier,
    /// Rate in basis points (1900 = 19.00%).
    pub rate_bp: u32,
}

impl TransferObject for Tax {
    const TYPE: ObjectType = ObjectType::Tax;

    fn identifier(&self) -> ObjectIdentifier {
        self.identifier
    }
}
