//! Last-changed cursor persistence.
//!
//! Each change-detection collaborator tracks "what changed since the previous
//! run" under an **explicit named key** it supplies itself (e.g.
//! `"erp.orders"`); nothing is derived from type names at runtime. The cursor
//! advances only after a run completes, so a crashed run re-reads the same
//! window.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

/// 2000-01-01T00:00:00Z: where a collaborator that has never completed a run
/// starts reading from.
const FALLBACK_START_UNIX: i64 = 946_684_800;

fn fallback_start() -> DateTime<Utc> {
    DateTime::from_timestamp(FALLBACK_START_UNIX, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Cursor store for last-changed bookkeeping.
pub trait SyncCursorStore: Send + Sync {
    /// When the keyed collaborator last completed a run, if ever.
    fn last_changed(&self, key: &str) -> Option<DateTime<Utc>>;

    /// Advance the cursor.
    fn set_last_changed(&self, key: &str, at: DateTime<Utc>);
}

/// The lower bound of the next change window for `key`: the stored cursor,
/// or the fixed fallback start when none exists yet.
pub fn changed_since(store: &dyn SyncCursorStore, key: &str) -> DateTime<Utc> {
    store.last_changed(key).unwrap_or_else(fallback_start)
}

/// In-memory cursor store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemorySyncCursorStore {
    cursors: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl InMemorySyncCursorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SyncCursorStore for InMemorySyncCursorStore {
    fn last_changed(&self, key: &str) -> Option<DateTime<Utc>> {
        self.cursors.read().ok()?.get(key).copied()
    }

    fn set_last_changed(&self, key: &str, at: DateTime<Utc>) {
        if let Ok(mut cursors) = self.cursors.write() {
            cursors.insert(key.to_string(), at);
        }
    }
}

/// Postgres-backed cursor store.
///
/// Expected schema:
///
/// ```sql
/// CREATE TABLE sync_cursors (
///     cursor_key   TEXT        PRIMARY KEY,
///     last_changed TIMESTAMPTZ NOT NULL,
///     updated_at   TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
pub struct PostgresSyncCursorStore {
    pool: Arc<PgPool>,
}

impl PostgresSyncCursorStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

impl SyncCursorStore for PostgresSyncCursorStore {
    fn last_changed(&self, key: &str) -> Option<DateTime<Utc>> {
        let handle = tokio::runtime::Handle::try_current().ok()?;
        let pool = self.pool.clone();
        let key = key.to_string();

        handle.block_on(async {
            let row = sqlx::query(
                r#"
                SELECT last_changed
                FROM sync_cursors
                WHERE cursor_key = $1
                "#,
            )
            .bind(&key)
            .fetch_optional(&*pool)
            .await
            .ok()??;

            row.try_get::<DateTime<Utc>, _>("last_changed").ok()
        })
    }

    fn set_last_changed(&self, key: &str, at: DateTime<Utc>) {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(h) => h,
            Err(_) => return,
        };

        let pool = self.pool.clone();
        let key = key.to_string();

        let _ = handle.block_on(async {
            sqlx::query(
                r#"
                INSERT INTO sync_cursors (cursor_key, last_changed)
                VALUES ($1, $2)
                ON CONFLICT (cursor_key)
                DO UPDATE SET
                    last_changed = EXCLUDED.last_changed,
                    updated_at = NOW()
                "#,
            )
            .bind(&key)
            .bind(at)
            .execute(&*pool)
            .await
        });
    }
}
