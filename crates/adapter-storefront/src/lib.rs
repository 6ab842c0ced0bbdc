//! `syncforge-adapter-storefront` — handlers for the storefront platform.
//!
//! The storefront is the shop-facing side of the synchronization: it owns
//! manufacturers materialized from the canonical domain and receives
//! post-write order reconciliation (tracking codes, status transitions).

use syncforge_core::AdapterName;

pub mod manufacturer;
pub mod order;

#[cfg(test)]
pub(crate) mod testing;

/// Adapter name the storefront handlers register under.
pub const ADAPTER_NAME: &str = "storefront";

pub fn adapter_name() -> AdapterName {
    AdapterName::from(ADAPTER_NAME)
}

pub use manufacturer::{
    CreateManufacturerHandler, ManufacturerParamsGenerator, RemoveManufacturerHandler,
    UpdateManufacturerHandler,
};
pub use order::{HandleOrderHandler, OrderReconciliationGenerator};
