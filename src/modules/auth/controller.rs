use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use hostelhub_core::AppError;
use hostelhub_models::{
    ChangePasswordDto, LoginRequest, LoginResponse, MessageResponse, PublicProfile,
};
use tracing::instrument;
use utoipa::ToSchema;

use super::service::AuthService;
use crate::middleware::auth::CurrentIdentity;
use crate::state::AppState;
use crate::validator::{ValidatedJson, json_rejection_to_error};

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Login with a handle and password and receive a session token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Handle or password missing", body = ErrorResponse),
        (status = 401, description = "Invalid handle or password", body = ErrorResponse),
        (status = 503, description = "Credential store unavailable", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(dto) = payload.map_err(json_rejection_to_error)?;
    let response = AuthService::login(state.store.as_ref(), &state.tokens, dto).await?;
    Ok(Json(response))
}

/// Get the signed-in identity's profile
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current identity", body = PublicProfile),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(identity_id = %current.id))]
pub async fn get_me(
    State(state): State<AppState>,
    current: CurrentIdentity,
) -> Result<Json<PublicProfile>, AppError> {
    let profile = AuthService::get_profile(state.store.as_ref(), &current).await?;
    Ok(Json(profile))
}

/// Change the signed-in identity's password
#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Current password is incorrect", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(identity_id = %current.id))]
pub async fn change_password(
    State(state): State<AppState>,
    current: CurrentIdentity,
    ValidatedJson(dto): ValidatedJson<ChangePasswordDto>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::change_password(state.store.as_ref(), &current, dto).await?;
    Ok(Json(MessageResponse::new("Password changed successfully")))
}
