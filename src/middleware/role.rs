//! Role-based authorization middleware for Axum
//!
//! Routes declare the roles they admit as a [`RoleSet`]. The check runs
//! after [`authenticate`](crate::middleware::auth::authenticate) and reads
//! the [`CurrentIdentity`] it left in the request extensions.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use hostelhub_core::{AppError, AuthError, RoleSet};
use hostelhub_observability::track_gate_rejection;

use crate::middleware::auth::CurrentIdentity;

/// Checks an authenticated identity against a role allow-list.
///
/// Without an identity this fails closed with [`AuthError::TokenMissing`],
/// which happens only if a route was wired without the authentication
/// layer in front.
pub fn authorize(identity: Option<&CurrentIdentity>, allowed: &RoleSet) -> Result<(), AuthError> {
    let identity = identity.ok_or(AuthError::TokenMissing)?;
    if allowed.contains(identity.role) {
        Ok(())
    } else {
        Err(AuthError::RoleNotPermitted)
    }
}

/// Middleware admitting only identities whose role is in the state's
/// [`RoleSet`].
///
/// # Usage with axum::middleware::from_fn_with_state
///
/// ```rust,ignore
/// use axum::{Router, middleware};
/// use hostelhub_core::RoleSet;
///
/// let admin_routes = Router::new()
///     .route("/identities", post(register_identity))
///     .route_layer(middleware::from_fn_with_state(RoleSet::ADMIN_ONLY, require_roles))
///     .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));
/// ```
pub async fn require_roles(State(allowed): State<RoleSet>, req: Request, next: Next) -> Response {
    let identity = req.extensions().get::<CurrentIdentity>();

    if let Err(err) = authorize(identity, &allowed) {
        tracing::debug!(
            reason = err.reason(),
            role = ?identity.map(|i| i.role),
            allowed = %allowed,
            "Request rejected by role check"
        );
        track_gate_rejection(err.reason());
        return AppError::from(err).into_response();
    }

    next.run(req).await
}
