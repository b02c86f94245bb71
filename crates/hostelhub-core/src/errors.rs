//! Application error types with HTTP response conversion.
//!
//! [`AppError`] is what every handler returns. [`AuthError`] is the closed
//! taxonomy of authentication and authorization failures; its variants stay
//! distinguishable for logging while collapsing into deliberately vague
//! messages on the wire.

use anyhow::{Error, anyhow};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Failures raised by the login flow and the request gates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("missing credentials")]
    MissingCredentials,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("missing bearer token")]
    TokenMissing,

    #[error("malformed token")]
    TokenMalformed,

    #[error("token expired")]
    TokenExpired,

    #[error("token signature invalid")]
    TokenSignatureInvalid,

    #[error("identity inactive or gone")]
    IdentityInactiveOrGone,

    #[error("role not permitted")]
    RoleNotPermitted,

    #[error("credential store unavailable: {0}")]
    PersistenceUnavailable(String),
}

impl AuthError {
    /// HTTP status surfaced to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::TokenMissing
            | AuthError::TokenMalformed
            | AuthError::TokenExpired
            | AuthError::TokenSignatureInvalid
            | AuthError::IdentityInactiveOrGone => StatusCode::UNAUTHORIZED,
            AuthError::RoleNotPermitted => StatusCode::FORBIDDEN,
            AuthError::PersistenceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Message surfaced to the caller. Token failures share one message so
    /// the response never says which check failed.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => "Please provide a handle and password",
            AuthError::InvalidCredentials => "Invalid handle or password",
            AuthError::TokenMissing => "You are not logged in",
            AuthError::TokenMalformed
            | AuthError::TokenExpired
            | AuthError::TokenSignatureInvalid => "Not authenticated",
            AuthError::IdentityInactiveOrGone => "User no longer exists",
            AuthError::RoleNotPermitted => "Permission denied",
            AuthError::PersistenceUnavailable(_) => "Service temporarily unavailable",
        }
    }

    /// Short label used for log fields and metric labels.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => "missing_credentials",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::TokenMissing => "token_missing",
            AuthError::TokenMalformed => "token_malformed",
            AuthError::TokenExpired => "token_expired",
            AuthError::TokenSignatureInvalid => "token_signature_invalid",
            AuthError::IdentityInactiveOrGone => "identity_inactive_or_gone",
            AuthError::RoleNotPermitted => "role_not_permitted",
            AuthError::PersistenceUnavailable(_) => "persistence_unavailable",
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn internal_error(message: String) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, anyhow!(message))
    }

    pub fn unavailable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized(message: String) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow!(message))
    }

    pub fn forbidden(message: String) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow!(message))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = if self.status.is_server_error() {
            tracing::error!(status = %self.status.as_u16(), error = ?self.error, "Request failed");
            match self.status {
                StatusCode::SERVICE_UNAVAILABLE => "Service temporarily unavailable".to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            self.error.to_string()
        };

        let body = Json(json!({
            "error": message
        }));

        (self.status, body).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        if let AuthError::PersistenceUnavailable(cause) = &err {
            tracing::error!(cause = %cause, "Credential store unavailable");
        }
        AppError::new(err.status(), anyhow!(err.public_message()))
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        AppError::internal(err)
    }
}
