//! Authentication domain models and DTOs.
//!
//! Login requests, login responses, and self-service password changes.

use chrono::{DateTime, Utc};
use hostelhub_core::Role;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::identities::SessionUser;

// Re-export the JWT claim type so consumers only need this crate
pub use hostelhub_auth::Claims;

/// Login request with a handle and password.
///
/// Both fields are optional at the type level so a missing field surfaces
/// as a missing-credentials error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(
        default,
        alias = "employee_id",
        alias = "employeeId",
        alias = "roll_number",
        alias = "rollNumber"
    )]
    #[schema(example = "STAFF001")]
    pub handle: Option<String>,
    #[serde(default, alias = "secret")]
    #[schema(example = "Passw0rd!")]
    pub password: Option<String>,
    /// Optional role hint. A hint that disagrees with the stored role fails
    /// the login exactly like a wrong password.
    #[serde(default)]
    pub role: Option<Role>,
}

impl LoginRequest {
    /// Returns the trimmed handle and the password when both are non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let handle = self.handle.as_deref().map(str::trim).filter(|h| !h.is_empty())?;
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some((handle, password))
    }
}

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user: SessionUser,
}

/// Self-service password change for the signed-in identity.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordDto {
    #[validate(length(min = 1))]
    #[serde(alias = "old_password")]
    pub current_password: String,
    #[validate(length(min = 8, max = 128))]
    #[schema(example = "newPassword123")]
    pub new_password: String,
}

/// Generic message response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
