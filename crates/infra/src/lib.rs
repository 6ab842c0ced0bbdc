//! `syncforge-infra` — durable backends and workspace integration tests.
//!
//! Everything here talks to real storage: the Postgres identity store and the
//! sync-cursor (last-changed) store. The in-memory counterparts live next to
//! their traits so domain crates stay IO-free.

pub mod identity_store;
pub mod sync_cursor;


pub use identity_store::PostgresIdentityStore;
pub use sync_cursor::{
    InMemorySyncCursorStore, PostgresSyncCursorStore, SyncCursorStore, changed_since,
};
