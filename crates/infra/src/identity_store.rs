//! Postgres-backed identity store.
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE identities (
//!     adapter_name        TEXT        NOT NULL,
//!     object_type         TEXT        NOT NULL,
//!     object_identifier   UUID        NOT NULL,
//!     adapter_identifier  TEXT        NOT NULL,
//!     created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     UNIQUE (adapter_name, object_type, object_identifier)
//! );
//! ```
//!
//! The uniqueness invariant on the source triple is enforced by the database,
//! not just by handler logic: of two concurrent inserts for the same triple
//! exactly one commits, the other observes the unique violation and surfaces
//! it as [`IdentityError::Conflict`] so the caller degrades to update
//! semantics.

use std::str::FromStr;
use std::sync::Arc;

use sqlx::{PgPool, Row};
use uuid::Uuid;

use syncforge_core::{AdapterIdentifier, AdapterName, ObjectIdentifier, ObjectType};
use syncforge_identity::{Identity, IdentityCriteria, IdentityError, IdentityStore};

/// Postgres-backed [`IdentityStore`].
///
/// The trait is synchronous; this implementation bridges onto the ambient
/// tokio runtime the way the other Postgres stores in this crate do.
#[derive(Debug, Clone)]
pub struct PostgresIdentityStore {
    pool: Arc<PgPool>,
}

impl PostgresIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    fn runtime() -> Result<tokio::runtime::Handle, IdentityError> {
        tokio::runtime::Handle::try_current()
            .map_err(|_| IdentityError::Storage("no tokio runtime available".to_string()))
    }

    async fn find_async(
        pool: &PgPool,
        criteria: &IdentityCriteria,
    ) -> Result<Vec<Identity>, IdentityError> {
        let object_identifier: Option<Uuid> =
            criteria.object_identifier.map(|id| *id.as_uuid());

        let rows = sqlx::query(
            r#"
            SELECT adapter_name, object_type, object_identifier, adapter_identifier
            FROM identities
            WHERE ($1::text IS NULL OR adapter_name = $1)
              AND ($2::text IS NULL OR object_type = $2)
              AND ($3::uuid IS NULL OR object_identifier = $3)
              AND ($4::text IS NULL OR adapter_identifier = $4)
            ORDER BY created_at ASC
            "#,
        )
        .bind(criteria.adapter_name.as_ref().map(|n| n.as_str()))
        .bind(criteria.object_type.map(|t| t.as_str()))
        .bind(object_identifier)
        .bind(criteria.adapter_identifier.as_ref().map(|i| i.as_str()))
        .fetch_all(pool)
        .await
        .map_err(storage_error)?;

        let mut identities = Vec::with_capacity(rows.len());
        for row in rows {
            identities.push(row_to_identity(&row)?);
        }
        Ok(identities)
    }

    async fn insert_async(pool: &PgPool, identity: &Identity) -> Result<(), IdentityError> {
        sqlx::query(
            r#"
            INSERT INTO identities (adapter_name, object_type, object_identifier, adapter_identifier)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(identity.adapter_name.as_str())
        .bind(identity.object_type.as_str())
        .bind(identity.object_identifier.as_uuid())
        .bind(identity.adapter_identifier.as_str())
        .execute(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                IdentityError::Conflict {
                    adapter_name: identity.adapter_name.clone(),
                    object_type: identity.object_type,
                    object_identifier: identity.object_identifier,
                }
            } else {
                storage_error(e)
            }
        })?;

        Ok(())
    }

    async fn remove_async(pool: &PgPool, identity: &Identity) -> Result<bool, IdentityError> {
        let result = sqlx::query(
            r#"
            DELETE FROM identities
            WHERE adapter_name = $1 AND object_type = $2 AND object_identifier = $3
            "#,
        )
        .bind(identity.adapter_name.as_str())
        .bind(identity.object_type.as_str())
        .bind(identity.object_identifier.as_uuid())
        .execute(pool)
        .await
        .map_err(storage_error)?;

        Ok(result.rows_affected() > 0)
    }
}

impl IdentityStore for PostgresIdentityStore {
    fn find(&self, criteria: &IdentityCriteria) -> Result<Vec<Identity>, IdentityError> {
        let handle = Self::runtime()?;
        let pool = self.pool.clone();
        handle.block_on(Self::find_async(&pool, criteria))
    }

    fn insert(&self, identity: Identity) -> Result<(), IdentityError> {
        let handle = Self::runtime()?;
        let pool = self.pool.clone();
        handle.block_on(Self::insert_async(&pool, &identity))
    }

    fn remove(&self, identity: &Identity) -> Result<bool, IdentityError> {
        let handle = Self::runtime()?;
        let pool = self.pool.clone();
        handle.block_on(Self::remove_async(&pool, identity))
    }
}

fn row_to_identity(row: &sqlx::postgres::PgRow) -> Result<Identity, IdentityError> {
    let adapter_name: String = row.try_get("adapter_name").map_err(storage_error)?;
    let object_type: String = row.try_get("object_type").map_err(storage_error)?;
    let object_identifier: Uuid = row.try_get("object_identifier").map_err(storage_error)?;
    let adapter_identifier: String = row.try_get("adapter_identifier").map_err(storage_error)?;

    let object_type = ObjectType::from_str(&object_type)
        .map_err(|e| IdentityError::Storage(format!("corrupt identity row: {e}")))?;

    Ok(Identity::new(
        AdapterName::from(adapter_name),
        object_type,
        ObjectIdentifier::from(object_identifier),
        AdapterIdentifier::from(adapter_identifier),
    ))
}

fn storage_error(err: sqlx::Error) -> IdentityError {
    IdentityError::Storage(err.to_string())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}
