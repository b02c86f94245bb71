//! The credential store abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hostelhub_core::{AppError, AuthError, HashedSecret};
use hostelhub_models::{Identity, IdentityFilter, NewIdentity, ProfileChanges};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("an identity with this handle already exists")]
    DuplicateHandle,

    #[error("credential store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    #[error("stored identity is corrupt: {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::DuplicateHandle
            }
            // Schema or row shape mismatches are bugs, not outages.
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::TypeNotFound { .. }
            | sqlx::Error::Decode(_) => StoreError::Corrupt(err.to_string()),
            _ => StoreError::Unavailable(err),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateHandle => AppError::conflict(err),
            StoreError::Unavailable(_) => AppError::unavailable(err),
            StoreError::Corrupt(_) => AppError::internal(err),
        }
    }
}

/// Any store failure seen by the login flow or the gates is reported as
/// the store being unavailable; the cause is carried for logging only.
impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::PersistenceUnavailable(err.to_string())
    }
}

/// Persistence for identities.
///
/// Handles passed in are normalized by the store before comparison, and
/// every `find_active_*` lookup excludes deactivated identities.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn insert(&self, new: NewIdentity) -> Result<Identity, StoreError>;

    async fn find_active_by_handle(&self, handle: &str) -> Result<Option<Identity>, StoreError>;

    async fn find_active_by_id(&self, id: Uuid) -> Result<Option<Identity>, StoreError>;

    /// Looks up an identity regardless of its active flag.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, StoreError>;

    /// Looks up an identity regardless of its active flag.
    async fn find_by_handle(&self, handle: &str) -> Result<Option<Identity>, StoreError>;

    /// Newest first.
    async fn list(&self, filter: &IdentityFilter) -> Result<Vec<Identity>, StoreError>;

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<Option<Identity>, StoreError>;

    async fn set_active(&self, id: Uuid, active: bool) -> Result<Option<Identity>, StoreError>;

    /// Returns `false` when no identity has this id.
    async fn replace_secret(&self, id: Uuid, secret: HashedSecret) -> Result<bool, StoreError>;

    async fn touch_last_active(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_errors_are_corrupt() {
        let errors = [
            sqlx::Error::ColumnNotFound("password_hash".to_string()),
            sqlx::Error::ColumnIndexOutOfBounds { index: 9, len: 3 },
            sqlx::Error::TypeNotFound {
                type_name: "identity_role".to_string(),
            },
            sqlx::Error::Decode("bad role".into()),
        ];
        for err in errors {
            let store_err = StoreError::from(err);
            assert!(matches!(store_err, StoreError::Corrupt(_)), "{store_err:?}");
            assert_eq!(AppError::from(store_err).status.as_u16(), 500);
        }
    }

    #[test]
    fn test_connection_errors_are_unavailable() {
        for err in [sqlx::Error::PoolTimedOut, sqlx::Error::PoolClosed] {
            let store_err = StoreError::from(err);
            assert!(matches!(store_err, StoreError::Unavailable(_)));
            assert_eq!(AppError::from(store_err).status.as_u16(), 503);
        }
    }
}
