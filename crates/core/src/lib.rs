//! `syncforge-core` — connector foundation building blocks.
//!
//! This crate contains the **pure domain** primitives shared by every other
//! crate in the workspace: strongly-typed identifiers, the closed set of
//! synchronized object types, the error taxonomy, and the boundary traits the
//! adapter handlers write through. No IO lives here.

pub mod attribute;
pub mod boundary;
pub mod error;
pub mod id;
pub mod object;

pub use attribute::Attribute;
pub use boundary::{AttributePersister, ResourceApi, ResourceError};
pub use error::{SyncError, SyncResult};
pub use id::{AdapterIdentifier, AdapterName, ObjectIdentifier};
pub use object::{ObjectType, TransferObject};
