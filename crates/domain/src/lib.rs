//! `syncforge-domain` — transfer objects in canonical form.
//!
//! Immutable-by-convention business entities exchanged between adapters.
//! Pure data: no IO, no identity lookups, no target-system knowledge - the
//! adapter crates derive target parameters from these.

pub mod manufacturer;
pub mod order;
pub mod payment;
pub mod references;
pub mod tax;

pub use manufacturer::Manufacturer;
pub use order::{Order, OrderLine, Package};
pub use payment::Payment;
pub use references::{Currency, OrderStatus, PaymentMethod, PaymentStatus};
pub use tax::Tax;
