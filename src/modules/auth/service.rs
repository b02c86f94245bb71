use anyhow::anyhow;
use chrono::Utc;
use hostelhub_auth::TokenIssuer;
use hostelhub_core::{AppError, AuthError};
use hostelhub_db::IdentityStore;
use hostelhub_models::{
    ChangePasswordDto, Identity, LoginRequest, LoginResponse, PublicProfile,
};
use hostelhub_observability::{track_login_failure, track_login_success, track_token_issued};
use tracing::instrument;

use crate::middleware::auth::CurrentIdentity;
use crate::utils::password::{hash_secret, verify_dummy_secret, verify_secret};

pub struct AuthService;

impl AuthService {
    /// Checks a handle and password against the store.
    ///
    /// An unknown handle and a wrong password both end in
    /// [`AuthError::InvalidCredentials`], and both cost one bcrypt
    /// verification.
    #[instrument(skip_all)]
    pub async fn verify_credentials(
        store: &dyn IdentityStore,
        dto: &LoginRequest,
    ) -> Result<Identity, AuthError> {
        let (handle, password) = dto.credentials().ok_or(AuthError::MissingCredentials)?;

        let Some(identity) = store.find_active_by_handle(handle).await? else {
            verify_dummy_secret(password.to_owned()).await;
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_secret(password.to_owned(), identity.secret.clone()).await {
            return Err(AuthError::InvalidCredentials);
        }

        if let Some(hint) = dto.role {
            if hint != identity.role {
                return Err(AuthError::InvalidCredentials);
            }
        }

        Ok(identity)
    }

    #[instrument(skip_all)]
    pub async fn login(
        store: &dyn IdentityStore,
        tokens: &TokenIssuer,
        dto: LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        let identity = match Self::verify_credentials(store, &dto).await {
            Ok(identity) => identity,
            Err(err) => {
                tracing::warn!(reason = err.reason(), "Login failed");
                track_login_failure(err.reason());
                return Err(err.into());
            }
        };

        let issued = tokens
            .issue(identity.id, identity.role)
            .map_err(|e| AppError::internal(anyhow!("Failed to issue token: {}", e)))?;
        track_token_issued();

        if let Err(e) = store.touch_last_active(identity.id, Utc::now()).await {
            tracing::warn!(error = %e, identity_id = %identity.id, "Failed to record last activity");
        }

        tracing::info!(identity_id = %identity.id, role = %identity.role, "Login succeeded");
        track_login_success(identity.role.as_str());

        Ok(LoginResponse {
            token: issued.token,
            token_type: "Bearer".to_string(),
            expires_at: issued.expires_at,
            user: identity.session_user(),
        })
    }

    #[instrument(skip_all, fields(identity_id = %current.id))]
    pub async fn get_profile(
        store: &dyn IdentityStore,
        current: &CurrentIdentity,
    ) -> Result<PublicProfile, AppError> {
        let identity = store
            .find_active_by_id(current.id)
            .await
            .map_err(AuthError::from)?
            .ok_or(AuthError::IdentityInactiveOrGone)?;

        Ok(identity.public_profile())
    }

    /// Rotates the caller's own secret after re-checking the current one.
    #[instrument(skip_all, fields(identity_id = %current.id))]
    pub async fn change_password(
        store: &dyn IdentityStore,
        current: &CurrentIdentity,
        dto: ChangePasswordDto,
    ) -> Result<(), AppError> {
        let identity = store
            .find_active_by_id(current.id)
            .await
            .map_err(AuthError::from)?
            .ok_or(AuthError::IdentityInactiveOrGone)?;

        if !verify_secret(dto.current_password, identity.secret).await {
            return Err(AppError::bad_request(anyhow!(
                "Current password is incorrect"
            )));
        }

        let secret = hash_secret(dto.new_password).await?;
        if !store.replace_secret(identity.id, secret).await? {
            return Err(AuthError::IdentityInactiveOrGone.into());
        }

        tracing::info!("Password changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostelhub_config::JwtConfig;
    use hostelhub_core::Role;
    use hostelhub_core::password::hash_password_with_cost;
    use hostelhub_db::MemoryIdentityStore;
    use hostelhub_models::NewIdentity;

    async fn seeded_store() -> (MemoryIdentityStore, Identity) {
        let store = MemoryIdentityStore::new();
        let identity = store
            .insert(NewIdentity {
                name: "Amaka Obi".to_string(),
                handle: "STAFF001".to_string(),
                secret: hash_password_with_cost("Passw0rd!", 4).unwrap(),
                role: Role::Staff,
                contact: None,
            })
            .await
            .unwrap();
        (store, identity)
    }

    fn request(handle: Option<&str>, password: Option<&str>, role: Option<Role>) -> LoginRequest {
        LoginRequest {
            handle: handle.map(str::to_string),
            password: password.map(str::to_string),
            role,
        }
    }

    #[tokio::test]
    async fn test_verify_credentials_success_is_case_insensitive() {
        let (store, identity) = seeded_store().await;
        let found =
            AuthService::verify_credentials(&store, &request(Some("staff001"), Some("Passw0rd!"), None))
                .await
                .unwrap();
        assert_eq!(found.id, identity.id);
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let (store, _) = seeded_store().await;
        for dto in [
            request(None, Some("Passw0rd!"), None),
            request(Some("STAFF001"), None, None),
            request(Some(""), Some(""), None),
        ] {
            assert_eq!(
                AuthService::verify_credentials(&store, &dto).await.unwrap_err(),
                AuthError::MissingCredentials
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_handle_and_wrong_password_are_identical() {
        let (store, _) = seeded_store().await;
        let unknown =
            AuthService::verify_credentials(&store, &request(Some("UNKNOWN"), Some("x"), None))
                .await
                .unwrap_err();
        let wrong =
            AuthService::verify_credentials(&store, &request(Some("STAFF001"), Some("x"), None))
                .await
                .unwrap_err();
        assert_eq!(unknown, AuthError::InvalidCredentials);
        assert_eq!(unknown, wrong);
    }

    #[tokio::test]
    async fn test_role_hint_mismatch_is_invalid_credentials() {
        let (store, _) = seeded_store().await;
        let result = AuthService::verify_credentials(
            &store,
            &request(Some("STAFF001"), Some("Passw0rd!"), Some(Role::Admin)),
        )
        .await;
        assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);

        let result = AuthService::verify_credentials(
            &store,
            &request(Some("STAFF001"), Some("Passw0rd!"), Some(Role::Staff)),
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_inactive_identity_cannot_log_in() {
        let (store, identity) = seeded_store().await;
        store.set_active(identity.id, false).await.unwrap();
        let result =
            AuthService::verify_credentials(&store, &request(Some("STAFF001"), Some("Passw0rd!"), None))
                .await;
        assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token_and_records_activity() {
        let (store, identity) = seeded_store().await;
        let tokens = TokenIssuer::new(
            &JwtConfig::new("test-secret-key-at-least-32-characters-long", 3600).unwrap(),
        );

        let response = AuthService::login(
            &store,
            &tokens,
            request(Some("STAFF001"), Some("Passw0rd!"), None),
        )
        .await
        .unwrap();

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.user.id, identity.id);
        assert_eq!(response.user.role, Role::Staff);

        let claims = tokens.verify(&response.token).unwrap();
        assert_eq!(claims.subject_id(), Ok(identity.id));
        assert_eq!(claims.exp, response.expires_at.timestamp());

        let stored = store.find_by_id(identity.id).await.unwrap().unwrap();
        assert!(stored.last_active_at.is_some());
    }
}
