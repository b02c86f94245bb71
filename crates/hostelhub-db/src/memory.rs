//! In-process [`IdentityStore`] used by tests and local tooling.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hostelhub_core::HashedSecret;
use hostelhub_models::{
    Identity, IdentityFilter, NewIdentity, ProfileChanges, normalize_handle,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::{IdentityStore, StoreError};

struct Entry {
    seq: u64,
    identity: Identity,
}

/// Identities kept in a map behind a tokio `RwLock`.
///
/// [`set_unavailable`](Self::set_unavailable) makes every call fail as if
/// the database were unreachable.
#[derive(Default)]
pub struct MemoryIdentityStore {
    entries: RwLock<HashMap<Uuid, Entry>>,
    next_seq: AtomicU64,
    unavailable: AtomicBool,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn insert(&self, new: NewIdentity) -> Result<Identity, StoreError> {
        self.check_available()?;
        let handle = normalize_handle(&new.handle);

        let mut entries = self.entries.write().await;
        if entries.values().any(|e| e.identity.handle == handle) {
            return Err(StoreError::DuplicateHandle);
        }

        let now = Utc::now();
        let identity = Identity {
            id: Uuid::new_v4(),
            name: new.name,
            handle,
            secret: new.secret,
            role: new.role,
            is_active: true,
            contact: new.contact,
            created_at: now,
            updated_at: now,
            last_active_at: None,
        };
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        entries.insert(
            identity.id,
            Entry {
                seq,
                identity: identity.clone(),
            },
        );

        Ok(identity)
    }

    async fn find_active_by_handle(&self, handle: &str) -> Result<Option<Identity>, StoreError> {
        Ok(self
            .find_by_handle(handle)
            .await?
            .filter(|identity| identity.is_active))
    }

    async fn find_active_by_id(&self, id: Uuid) -> Result<Option<Identity>, StoreError> {
        Ok(self
            .find_by_id(id)
            .await?
            .filter(|identity| identity.is_active))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, StoreError> {
        self.check_available()?;
        let entries = self.entries.read().await;
        Ok(entries.get(&id).map(|e| e.identity.clone()))
    }

    async fn find_by_handle(&self, handle: &str) -> Result<Option<Identity>, StoreError> {
        self.check_available()?;
        let handle = normalize_handle(handle);
        let entries = self.entries.read().await;
        Ok(entries
            .values()
            .find(|e| e.identity.handle == handle)
            .map(|e| e.identity.clone()))
    }

    async fn list(&self, filter: &IdentityFilter) -> Result<Vec<Identity>, StoreError> {
        self.check_available()?;
        let entries = self.entries.read().await;

        let mut matching: Vec<&Entry> = entries
            .values()
            .filter(|e| filter.include_inactive || e.identity.is_active)
            .filter(|e| filter.role.is_none_or(|role| e.identity.role == role))
            .collect();
        matching.sort_by(|a, b| {
            b.identity
                .created_at
                .cmp(&a.identity.created_at)
                .then(b.seq.cmp(&a.seq))
        });

        Ok(matching.into_iter().map(|e| e.identity.clone()).collect())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<Option<Identity>, StoreError> {
        self.check_available()?;
        let mut entries = self.entries.write().await;
        let Some(entry) = entries.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = &changes.name {
            entry.identity.name = name.clone();
        }
        if let Some(contact) = &changes.contact {
            entry.identity.contact = Some(contact.clone()).filter(|c| !c.is_empty());
        }
        entry.identity.updated_at = Utc::now();

        Ok(Some(entry.identity.clone()))
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<Option<Identity>, StoreError> {
        self.check_available()?;
        let mut entries = self.entries.write().await;
        let Some(entry) = entries.get_mut(&id) else {
            return Ok(None);
        };

        entry.identity.is_active = active;
        entry.identity.updated_at = Utc::now();

        Ok(Some(entry.identity.clone()))
    }

    async fn replace_secret(&self, id: Uuid, secret: HashedSecret) -> Result<bool, StoreError> {
        self.check_available()?;
        let mut entries = self.entries.write().await;
        let Some(entry) = entries.get_mut(&id) else {
            return Ok(false);
        };

        entry.identity.secret = secret;
        entry.identity.updated_at = Utc::now();

        Ok(true)
    }

    async fn touch_last_active(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        self.check_available()?;
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get_mut(&id) {
            entry.identity.last_active_at = Some(at);
        }
        Ok(())
    }
}
