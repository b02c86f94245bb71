use crate::middleware::auth::authenticate;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::controller::{change_password, get_me, login};

pub fn init_auth_router(state: AppState) -> Router<AppState> {
    let authenticated = Router::new()
        .route("/me", get(get_me))
        .route("/change-password", post(change_password))
        .route_layer(middleware::from_fn_with_state(state, authenticate));

    Router::new()
        .route("/login", post(login))
        .merge(authenticated)
}
