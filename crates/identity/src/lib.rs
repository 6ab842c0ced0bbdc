//! `syncforge-identity` — durable cross-system identity mapping.
//!
//! This crate owns the bidirectional mapping between an object's canonical
//! identifier and its counterpart identifier on one adapter. No other crate
//! persists or caches mapping state beyond a single command's handling scope.

pub mod identity;
pub mod service;
pub mod store;

pub use identity::{Identity, IdentityCriteria};
pub use service::IdentityService;
pub use store::{IdentityError, IdentityStore, InMemoryIdentityStore};
