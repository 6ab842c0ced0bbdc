use serde::{Deserialize, Serialize};

use syncforge_core::{ObjectIdentifier, ObjectType, TransferObject};

/// A product manufacturer/brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manufacturer {
    pub identifier: ObjectIdentifier,
    pub name: String,
    pub link: Option<String>,
    pub logo_url: Option<String>,
}

impl Manufacturer {
    pub fn new(identifier: ObjectIdentifier, name: impl Into<String>) -> Self {
        Self {
            identifier,
            name: name.into(),
            link: None,
            logo_url: None,
        }
    }
}

impl TransferObject for Manufacturer {
    const TYPE: ObjectType = ObjectType::Manufacturer;

    fn identifier(&self) -> ObjectIdentifier {
        self.identifier
    }
}
