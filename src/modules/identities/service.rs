use anyhow::anyhow;
use hostelhub_core::AppError;
use hostelhub_db::IdentityStore;
use hostelhub_models::{
    IdentityFilter, NewIdentity, ProfileChanges, PublicProfile, RegisterIdentityDto,
    ResetPasswordDto, UpdateIdentityDto, normalize_handle,
};
use hostelhub_observability::track_identity_registered;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::CurrentIdentity;
use crate::utils::password::hash_secret;

fn identity_not_found() -> AppError {
    AppError::not_found(anyhow!("Identity not found"))
}

pub struct IdentityService;

impl IdentityService {
    #[instrument(skip_all, fields(role = %dto.role))]
    pub async fn register(
        store: &dyn IdentityStore,
        dto: RegisterIdentityDto,
    ) -> Result<PublicProfile, AppError> {
        let secret = hash_secret(dto.password).await?;

        let identity = store
            .insert(NewIdentity {
                name: dto.name.trim().to_string(),
                handle: normalize_handle(&dto.handle),
                secret,
                role: dto.role,
                contact: dto
                    .contact
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty()),
            })
            .await?;

        tracing::info!(identity_id = %identity.id, handle = %identity.handle, "Identity registered");
        track_identity_registered(identity.role.as_str());

        Ok(identity.public_profile())
    }

    #[instrument(skip(store))]
    pub async fn list(
        store: &dyn IdentityStore,
        filter: IdentityFilter,
    ) -> Result<Vec<PublicProfile>, AppError> {
        let identities = store.list(&filter).await?;
        Ok(identities.iter().map(|i| i.public_profile()).collect())
    }

    #[instrument(skip(store))]
    pub async fn get(store: &dyn IdentityStore, id: Uuid) -> Result<PublicProfile, AppError> {
        store
            .find_by_id(id)
            .await?
            .map(|i| i.public_profile())
            .ok_or_else(identity_not_found)
    }

    #[instrument(skip(store, dto))]
    pub async fn update_profile(
        store: &dyn IdentityStore,
        id: Uuid,
        dto: UpdateIdentityDto,
    ) -> Result<PublicProfile, AppError> {
        let changes = ProfileChanges::from(dto);
        if changes.is_empty() {
            return Err(AppError::bad_request(anyhow!(
                "Provide a name or contact to update"
            )));
        }

        store
            .update_profile(id, &changes)
            .await?
            .map(|i| i.public_profile())
            .ok_or_else(identity_not_found)
    }

    /// Soft-deletes an identity. Tokens already issued to it stop working on
    /// their next use.
    #[instrument(skip(store, actor), fields(actor_id = %actor.id))]
    pub async fn deactivate(
        store: &dyn IdentityStore,
        actor: &CurrentIdentity,
        id: Uuid,
    ) -> Result<PublicProfile, AppError> {
        if actor.id == id {
            return Err(AppError::bad_request(anyhow!(
                "You cannot deactivate your own account"
            )));
        }

        let identity = store
            .set_active(id, false)
            .await?
            .ok_or_else(identity_not_found)?;

        tracing::info!(handle = %identity.handle, "Identity deactivated");
        Ok(identity.public_profile())
    }

    #[instrument(skip(store))]
    pub async fn activate(store: &dyn IdentityStore, id: Uuid) -> Result<PublicProfile, AppError> {
        let identity = store
            .set_active(id, true)
            .await?
            .ok_or_else(identity_not_found)?;

        tracing::info!(handle = %identity.handle, "Identity activated");
        Ok(identity.public_profile())
    }

    #[instrument(skip(store, dto))]
    pub async fn reset_password(
        store: &dyn IdentityStore,
        id: Uuid,
        dto: ResetPasswordDto,
    ) -> Result<(), AppError> {
        let secret = hash_secret(dto.new_password).await?;
        if !store.replace_secret(id, secret).await? {
            return Err(identity_not_found());
        }

        tracing::info!("Password reset by administrator");
        Ok(())
    }
}
