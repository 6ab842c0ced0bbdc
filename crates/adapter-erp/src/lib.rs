//! `syncforge-adapter-erp` — handlers for the ERP platform.
//!
//! The ERP is the back-office side of the synchronization: orders placed in
//! the storefront are materialized here, and payments are booked against
//! them. Both carry cross-references (payment method, currency, statuses,
//! taxes) that must be resolved through the identity service before a write
//! can be generated.

use syncforge_core::AdapterName;

pub mod order;
pub mod payment;

#[cfg(test)]
pub(crate) mod testing;

/// Adapter name the ERP handlers register under.
pub const ADAPTER_NAME: &str = "erp";

pub fn adapter_name() -> AdapterName {
    AdapterName::from(ADAPTER_NAME)
}

pub use order::{CreateOrderHandler, OrderParamsGenerator, TaxProvider};
pub use payment::{CreatePaymentHandler, PaymentParamsGenerator};
