use crate::middleware::auth::authenticate;
use crate::middleware::role::require_roles;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, patch, post, put},
};
use hostelhub_core::RoleSet;

use super::controller::{
    activate_identity, deactivate_identity, get_identity, list_identities, register_identity,
    reset_identity_password, update_identity,
};

/// Reads are open to staff and admins; every write is admin-only.
pub fn init_identities_router(state: AppState) -> Router<AppState> {
    let staff_and_admin = || middleware::from_fn_with_state(RoleSet::STAFF_AND_ADMIN, require_roles);
    let admin_only = || middleware::from_fn_with_state(RoleSet::ADMIN_ONLY, require_roles);

    Router::new()
        .route(
            "/",
            get(list_identities)
                .route_layer(staff_and_admin())
                .merge(post(register_identity).route_layer(admin_only())),
        )
        .route(
            "/{id}",
            get(get_identity)
                .route_layer(staff_and_admin())
                .merge(patch(update_identity).route_layer(admin_only())),
        )
        .route(
            "/{id}/deactivate",
            post(deactivate_identity).route_layer(admin_only()),
        )
        .route(
            "/{id}/activate",
            post(activate_identity).route_layer(admin_only()),
        )
        .route(
            "/{id}/password",
            put(reset_identity_password).route_layer(admin_only()),
        )
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}
