//! Identity administration commands, written against any [`IdentityStore`].

use anyhow::{Context, Result, anyhow, bail};
use hostelhub_core::{Role, hash_password};
use hostelhub_db::{IdentityStore, StoreError};
use hostelhub_models::{Identity, NewIdentity, RegisterIdentityDto, normalize_handle};
use validator::Validate;

/// Creates an admin identity after running the same validation as the
/// registration endpoint.
pub async fn create_admin(
    store: &dyn IdentityStore,
    name: &str,
    handle: &str,
    password: &str,
) -> Result<Identity> {
    let dto = RegisterIdentityDto {
        name: name.trim().to_string(),
        handle: handle.to_string(),
        password: password.to_string(),
        role: Role::Admin,
        contact: None,
    };
    dto.validate().context("Invalid admin details")?;

    let secret = hash_password(&dto.password).map_err(|e| anyhow!("{}", e.error))?;

    store
        .insert(NewIdentity {
            name: dto.name,
            handle: normalize_handle(&dto.handle),
            secret,
            role: Role::Admin,
            contact: None,
        })
        .await
        .map_err(|e| match e {
            StoreError::DuplicateHandle => anyhow!("Handle {} is already taken", normalize_handle(handle)),
            other => anyhow!(other),
        })
}

async fn require_by_handle(store: &dyn IdentityStore, handle: &str) -> Result<Identity> {
    store
        .find_by_handle(handle)
        .await?
        .ok_or_else(|| anyhow!("No identity with handle {}", normalize_handle(handle)))
}

pub async fn set_active(store: &dyn IdentityStore, handle: &str, active: bool) -> Result<Identity> {
    let identity = require_by_handle(store, handle).await?;
    if identity.is_active == active {
        return Ok(identity);
    }

    store
        .set_active(identity.id, active)
        .await?
        .ok_or_else(|| anyhow!("Identity {} disappeared", identity.handle))
}

pub async fn reset_password(store: &dyn IdentityStore, handle: &str, password: &str) -> Result<()> {
    if !(8..=128).contains(&password.chars().count()) {
        bail!("Password must be between 8 and 128 characters");
    }

    let identity = require_by_handle(store, handle).await?;
    let secret = hash_password(password).map_err(|e| anyhow!("{}", e.error))?;

    if !store.replace_secret(identity.id, secret).await? {
        bail!("Identity {} disappeared", identity.handle);
    }
    Ok(())
}
