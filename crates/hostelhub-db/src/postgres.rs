//! Postgres-backed [`IdentityStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hostelhub_core::{HashedSecret, Role};
use hostelhub_models::{
    Identity, IdentityFilter, NewIdentity, ProfileChanges, normalize_handle,
};
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use crate::store::{IdentityStore, StoreError};

const IDENTITY_COLUMNS: &str = "id, name, handle, password_hash, role, is_active, contact, \
     created_at, updated_at, last_active_at";

#[derive(FromRow)]
struct IdentityRow {
    id: Uuid,
    name: String,
    handle: String,
    password_hash: String,
    role: String,
    is_active: bool,
    contact: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_active_at: Option<DateTime<Utc>>,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = StoreError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|_| StoreError::Corrupt(format!("unknown role `{}` on {}", row.role, row.id)))?;

        Ok(Identity {
            id: row.id,
            name: row.name,
            handle: row.handle,
            secret: HashedSecret::from_stored(row.password_hash),
            role,
            is_active: row.is_active,
            contact: row.contact,
            created_at: row.created_at,
            updated_at: row.updated_at,
            last_active_at: row.last_active_at,
        })
    }
}

fn into_identity(row: Option<IdentityRow>) -> Result<Option<Identity>, StoreError> {
    row.map(Identity::try_from).transpose()
}

#[derive(Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    #[instrument(skip_all, fields(handle = %new.handle, role = %new.role))]
    async fn insert(&self, new: NewIdentity) -> Result<Identity, StoreError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "INSERT INTO identities (id, name, handle, password_hash, role, contact)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {IDENTITY_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(normalize_handle(&new.handle))
        .bind(new.secret.as_str())
        .bind(new.role.as_str())
        .bind(&new.contact)
        .fetch_one(&self.pool)
        .await?;

        Identity::try_from(row)
    }

    #[instrument(skip(self))]
    async fn find_active_by_handle(&self, handle: &str) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM identities WHERE handle = $1 AND is_active = TRUE"
        ))
        .bind(normalize_handle(handle))
        .fetch_optional(&self.pool)
        .await?;

        into_identity(row)
    }

    #[instrument(skip(self))]
    async fn find_active_by_id(&self, id: Uuid) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM identities WHERE id = $1 AND is_active = TRUE"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        into_identity(row)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM identities WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        into_identity(row)
    }

    #[instrument(skip(self))]
    async fn find_by_handle(&self, handle: &str) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM identities WHERE handle = $1"
        ))
        .bind(normalize_handle(handle))
        .fetch_optional(&self.pool)
        .await?;

        into_identity(row)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: &IdentityFilter) -> Result<Vec<Identity>, StoreError> {
        let rows = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM identities
             WHERE ($1::VARCHAR IS NULL OR role = $1)
               AND ($2 OR is_active = TRUE)
             ORDER BY created_at DESC"
        ))
        .bind(filter.role.map(|r| r.as_str()))
        .bind(filter.include_inactive)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Identity::try_from).collect()
    }

    #[instrument(skip(self, changes))]
    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "UPDATE identities
             SET name = COALESCE($2, name),
                 contact = CASE WHEN $3::text IS NULL THEN contact ELSE NULLIF($3, '') END,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {IDENTITY_COLUMNS}"
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.contact)
        .fetch_optional(&self.pool)
        .await?;

        into_identity(row)
    }

    #[instrument(skip(self))]
    async fn set_active(&self, id: Uuid, active: bool) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "UPDATE identities SET is_active = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {IDENTITY_COLUMNS}"
        ))
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?;

        into_identity(row)
    }

    #[instrument(skip(self, secret))]
    async fn replace_secret(&self, id: Uuid, secret: HashedSecret) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE identities SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(secret.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn touch_last_active(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        sqlx::query("UPDATE identities SET last_active_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
