use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use hostelhub_core::AppError;
use hostelhub_models::{
    IdentityFilter, MessageResponse, PublicProfile, RegisterIdentityDto, ResetPasswordDto,
    UpdateIdentityDto,
};
use tracing::instrument;
use uuid::Uuid;

use super::service::IdentityService;
use crate::middleware::auth::CurrentIdentity;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Register a new identity
#[utoipa::path(
    post,
    path = "/api/identities",
    request_body = RegisterIdentityDto,
    responses(
        (status = 201, description = "Identity registered", body = PublicProfile),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 409, description = "Handle already taken", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Identities",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all)]
pub async fn register_identity(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterIdentityDto>,
) -> Result<(StatusCode, Json<PublicProfile>), AppError> {
    let profile = IdentityService::register(state.store.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// List identities, newest first
#[utoipa::path(
    get,
    path = "/api/identities",
    params(IdentityFilter),
    responses(
        (status = 200, description = "Identities", body = Vec<PublicProfile>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Staff or admin role required", body = ErrorResponse)
    ),
    tag = "Identities",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_identities(
    State(state): State<AppState>,
    Query(filter): Query<IdentityFilter>,
) -> Result<Json<Vec<PublicProfile>>, AppError> {
    let identities = IdentityService::list(state.store.as_ref(), filter).await?;
    Ok(Json(identities))
}

/// Get one identity's profile
#[utoipa::path(
    get,
    path = "/api/identities/{id}",
    params(("id" = Uuid, Path, description = "Identity ID")),
    responses(
        (status = 200, description = "Identity", body = PublicProfile),
        (status = 404, description = "Identity not found", body = ErrorResponse)
    ),
    tag = "Identities",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_identity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicProfile>, AppError> {
    let profile = IdentityService::get(state.store.as_ref(), id).await?;
    Ok(Json(profile))
}

/// Update an identity's name or contact
#[utoipa::path(
    patch,
    path = "/api/identities/{id}",
    params(("id" = Uuid, Path, description = "Identity ID")),
    request_body = UpdateIdentityDto,
    responses(
        (status = 200, description = "Updated identity", body = PublicProfile),
        (status = 400, description = "Nothing to update", body = ErrorResponse),
        (status = 404, description = "Identity not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Identities",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_identity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateIdentityDto>,
) -> Result<Json<PublicProfile>, AppError> {
    let profile = IdentityService::update_profile(state.store.as_ref(), id, dto).await?;
    Ok(Json(profile))
}

/// Deactivate an identity
#[utoipa::path(
    post,
    path = "/api/identities/{id}/deactivate",
    params(("id" = Uuid, Path, description = "Identity ID")),
    responses(
        (status = 200, description = "Identity deactivated", body = PublicProfile),
        (status = 400, description = "Cannot deactivate yourself", body = ErrorResponse),
        (status = 404, description = "Identity not found", body = ErrorResponse)
    ),
    tag = "Identities",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current))]
pub async fn deactivate_identity(
    State(state): State<AppState>,
    current: CurrentIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicProfile>, AppError> {
    let profile = IdentityService::deactivate(state.store.as_ref(), &current, id).await?;
    Ok(Json(profile))
}

/// Reactivate an identity
#[utoipa::path(
    post,
    path = "/api/identities/{id}/activate",
    params(("id" = Uuid, Path, description = "Identity ID")),
    responses(
        (status = 200, description = "Identity activated", body = PublicProfile),
        (status = 404, description = "Identity not found", body = ErrorResponse)
    ),
    tag = "Identities",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn activate_identity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicProfile>, AppError> {
    let profile = IdentityService::activate(state.store.as_ref(), id).await?;
    Ok(Json(profile))
}

/// Set a new password for an identity
#[utoipa::path(
    put,
    path = "/api/identities/{id}/password",
    params(("id" = Uuid, Path, description = "Identity ID")),
    request_body = ResetPasswordDto,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 404, description = "Identity not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Identities",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn reset_identity_password(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<ResetPasswordDto>,
) -> Result<Json<MessageResponse>, AppError> {
    IdentityService::reset_password(state.store.as_ref(), id, dto).await?;
    Ok(Json(MessageResponse::new("Password reset successfully")))
}
