//! Request authentication.
//!
//! [`AuthGate`] turns an `Authorization` header into a [`CurrentIdentity`]
//! or an [`AuthError`]. It knows nothing about axum; the
//! [`authenticate`] middleware and the [`CurrentIdentity`] extractor are the
//! framework adapters around it.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use hostelhub_auth::TokenIssuer;
use hostelhub_core::{AppError, AuthError, Role, RoleSet};
use hostelhub_db::IdentityStore;
use hostelhub_observability::track_gate_rejection;
use uuid::Uuid;

use crate::middleware::role::authorize;
use crate::state::AppState;

/// The identity a request was authenticated as.
///
/// `role` is the role carried in the verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentIdentity {
    pub id: Uuid,
    pub name: String,
    pub handle: String,
    pub role: Role,
}

/// Extracts the token from a `Bearer <token>` header value.
pub fn bearer_token(authorization: Option<&str>) -> Option<&str> {
    authorization?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub struct AuthGate<'a> {
    tokens: &'a TokenIssuer,
    store: &'a dyn IdentityStore,
}

impl<'a> AuthGate<'a> {
    pub fn new(tokens: &'a TokenIssuer, store: &'a dyn IdentityStore) -> Self {
        Self { tokens, store }
    }

    /// Verifies the bearer token and resolves it to a live identity.
    ///
    /// Performs exactly one store lookup, and only after the token checks
    /// out.
    pub async fn authenticate(
        &self,
        authorization: Option<&str>,
    ) -> Result<CurrentIdentity, AuthError> {
        let token = bearer_token(authorization).ok_or(AuthError::TokenMissing)?;

        let claims = self.tokens.verify(token)?;
        let id = claims.subject_id()?;

        let identity = self
            .store
            .find_active_by_id(id)
            .await?
            .ok_or(AuthError::IdentityInactiveOrGone)?;

        Ok(CurrentIdentity {
            id: identity.id,
            name: identity.name,
            handle: identity.handle,
            role: claims.role,
        })
    }

    /// Authenticates, then checks the role against `allowed`.
    pub async fn run(
        &self,
        authorization: Option<&str>,
        allowed: &RoleSet,
    ) -> Result<CurrentIdentity, AuthError> {
        let identity = self.authenticate(authorization).await?;
        authorize(Some(&identity), allowed)?;
        Ok(identity)
    }
}

fn reject(err: AuthError) -> Response {
    tracing::debug!(reason = err.reason(), "Request rejected by auth gate");
    track_gate_rejection(err.reason());
    AppError::from(err).into_response()
}

/// Middleware that authenticates the request and stores the resulting
/// [`CurrentIdentity`] in the request extensions.
///
/// # Usage
///
/// ```rust,ignore
/// Router::new()
///     .route("/me", get(get_me))
///     .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));
/// ```
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let gate = AuthGate::new(&state.tokens, state.store.as_ref());
    let result = gate.authenticate(authorization.as_deref()).await;
    match result {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Err(err) => reject(err),
    }
}

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentIdentity>()
            .cloned()
            .ok_or_else(|| AuthError::TokenMissing.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use hostelhub_config::JwtConfig;
    use hostelhub_core::password::hash_password_with_cost;
    use hostelhub_db::MemoryIdentityStore;
    use hostelhub_models::{Identity, NewIdentity};

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&JwtConfig::new(SECRET, 3600).unwrap())
    }

    async fn seed(store: &MemoryIdentityStore, handle: &str, role: Role) -> Identity {
        store
            .insert(NewIdentity {
                name: format!("{} name", handle),
                handle: handle.to_string(),
                secret: hash_password_with_cost("Passw0rd!", 4).unwrap(),
                role,
                contact: None,
            })
            .await
            .unwrap()
    }

    fn header_for(token: &str) -> String {
        format!("Bearer {}", token)
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(Some("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(Some("Bearer ")), None);
        assert_eq!(bearer_token(Some("Basic abc")), None);
        assert_eq!(bearer_token(Some("abc")), None);
        assert_eq!(bearer_token(None), None);
    }

    #[tokio::test]
    async fn test_missing_header_is_token_missing() {
        let store = MemoryIdentityStore::new();
        let tokens = issuer();
        let gate = AuthGate::new(&tokens, &store);

        assert_eq!(
            gate.authenticate(None).await,
            Err(AuthError::TokenMissing)
        );
        assert_eq!(
            gate.authenticate(Some("Token abc")).await,
            Err(AuthError::TokenMissing)
        );
    }

    #[tokio::test]
    async fn test_valid_token_resolves_identity() {
        let store = MemoryIdentityStore::new();
        let tokens = issuer();
        let identity = seed(&store, "STAFF001", Role::Staff).await;
        let issued = tokens.issue(identity.id, identity.role).unwrap();

        let gate = AuthGate::new(&tokens, &store);
        let current = gate
            .authenticate(Some(&header_for(&issued.token)))
            .await
            .unwrap();

        assert_eq!(current.id, identity.id);
        assert_eq!(current.handle, "STAFF001");
        assert_eq!(current.role, Role::Staff);
    }

    #[tokio::test]
    async fn test_token_failures() {
        let store = MemoryIdentityStore::new();
        let tokens = issuer();
        let identity = seed(&store, "STU001", Role::Student).await;
        let gate = AuthGate::new(&tokens, &store);

        assert_eq!(
            gate.authenticate(Some("Bearer not-a-jwt")).await,
            Err(AuthError::TokenMalformed)
        );

        let expired = tokens
            .issue_with_ttl(
                identity.id,
                identity.role,
                Duration::seconds(60),
                Utc::now() - Duration::hours(1),
            )
            .unwrap();
        assert_eq!(
            gate.authenticate(Some(&header_for(&expired.token))).await,
            Err(AuthError::TokenExpired)
        );

        let foreign = TokenIssuer::new(
            &JwtConfig::new("another-secret-key-at-least-32-characters", 3600).unwrap(),
        )
        .issue(identity.id, identity.role)
        .unwrap();
        assert_eq!(
            gate.authenticate(Some(&header_for(&foreign.token))).await,
            Err(AuthError::TokenSignatureInvalid)
        );
    }

    #[tokio::test]
    async fn test_deactivated_or_unknown_identity() {
        let store = MemoryIdentityStore::new();
        let tokens = issuer();
        let identity = seed(&store, "STU002", Role::Student).await;
        let issued = tokens.issue(identity.id, identity.role).unwrap();
        let gate = AuthGate::new(&tokens, &store);

        store.set_active(identity.id, false).await.unwrap();
        assert_eq!(
            gate.authenticate(Some(&header_for(&issued.token))).await,
            Err(AuthError::IdentityInactiveOrGone)
        );

        let ghost = tokens.issue(Uuid::new_v4(), Role::Admin).unwrap();
        assert_eq!(
            gate.authenticate(Some(&header_for(&ghost.token))).await,
            Err(AuthError::IdentityInactiveOrGone)
        );
    }

    #[tokio::test]
    async fn test_store_outage_is_persistence_unavailable() {
        let store = MemoryIdentityStore::new();
        let tokens = issuer();
        let identity = seed(&store, "STU003", Role::Student).await;
        let issued = tokens.issue(identity.id, identity.role).unwrap();
        let gate = AuthGate::new(&tokens, &store);

        store.set_unavailable(true);
        assert!(matches!(
            gate.authenticate(Some(&header_for(&issued.token))).await,
            Err(AuthError::PersistenceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_run_applies_role_check() {
        let store = MemoryIdentityStore::new();
        let tokens = issuer();
        let student = seed(&store, "STU004", Role::Student).await;
        let admin = seed(&store, "ADMIN01", Role::Admin).await;
        let gate = AuthGate::new(&tokens, &store);

        let student_token = tokens.issue(student.id, student.role).unwrap();
        assert_eq!(
            gate.run(Some(&header_for(&student_token.token)), &RoleSet::ADMIN_ONLY)
                .await,
            Err(AuthError::RoleNotPermitted)
        );

        let admin_token = tokens.issue(admin.id, admin.role).unwrap();
        let current = gate
            .run(Some(&header_for(&admin_token.token)), &RoleSet::ADMIN_ONLY)
            .await
            .unwrap();
        assert_eq!(current.role, Role::Admin);
    }
}
