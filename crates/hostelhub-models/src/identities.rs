//! Identity domain models and DTOs.
//!
//! [`Identity`] is the full stored record, hashed secret included, and is
//! never serialized. Everything that leaves the process goes through
//! [`PublicProfile`] or [`SessionUser`].

use chrono::{DateTime, Utc};
use hostelhub_core::{HashedSecret, Role};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const HANDLE_MIN_LEN: usize = 3;
pub const HANDLE_MAX_LEN: usize = 32;

/// A registered identity as held by the credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
    /// Unique login handle, stored normalized (see [`normalize_handle`]).
    pub handle: String,
    pub secret: HashedSecret,
    pub role: Role,
    pub is_active: bool,
    pub contact: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_active_at: Option<DateTime<Utc>>,
}

impl Identity {
    pub fn public_profile(&self) -> PublicProfile {
        PublicProfile {
            id: self.id,
            name: self.name.clone(),
            handle: self.handle.clone(),
            role: self.role,
            contact: self.contact.clone(),
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
            last_active_at: self.last_active_at,
        }
    }

    pub fn session_user(&self) -> SessionUser {
        SessionUser {
            id: self.id,
            name: self.name.clone(),
            role: self.role,
            handle: self.handle.clone(),
        }
    }
}

/// Everything needed to persist a new identity. The secret is already
/// hashed by the time one of these exists.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub name: String,
    pub handle: String,
    pub secret: HashedSecret,
    pub role: Role,
    pub contact: Option<String>,
}

/// Public view of an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PublicProfile {
    pub id: Uuid,
    pub name: String,
    #[schema(example = "STAFF001")]
    pub handle: String,
    pub role: Role,
    pub contact: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_active_at: Option<DateTime<Utc>>,
}

/// The identity summary embedded in a login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    pub handle: String,
}

/// Profile fields an administrator may change. `None` leaves a field as is;
/// an empty `contact` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub contact: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.contact.is_none()
    }
}

/// Query parameters for listing identities.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct IdentityFilter {
    /// Only return identities with this role
    pub role: Option<Role>,
    /// Include deactivated identities (default: false)
    #[serde(default)]
    pub include_inactive: bool,
}

/// Trims and upper-cases a handle so lookups are case-insensitive.
pub fn normalize_handle(handle: &str) -> String {
    handle.trim().to_uppercase()
}

fn validate_handle(handle: &str) -> Result<(), ValidationError> {
    let handle = handle.trim();
    let len = handle.chars().count();
    if !(HANDLE_MIN_LEN..=HANDLE_MAX_LEN).contains(&len) {
        return Err(ValidationError::new("handle_length"));
    }
    if !handle
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-'))
    {
        return Err(ValidationError::new("handle_charset"));
    }
    Ok(())
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// DTO for administrative registration.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterIdentityDto {
    #[validate(length(max = 100), custom(function = "validate_not_blank"))]
    #[schema(example = "Amaka Obi")]
    pub name: String,
    #[validate(custom(function = "validate_handle"))]
    #[serde(alias = "employee_id", alias = "roll_number")]
    #[schema(example = "STAFF001")]
    pub handle: String,
    #[validate(length(min = 8, max = 128))]
    #[schema(example = "Passw0rd!")]
    pub password: String,
    pub role: Role,
    #[validate(length(max = 100))]
    pub contact: Option<String>,
}

/// DTO for updating an identity's profile.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateIdentityDto {
    #[validate(length(max = 100), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    /// An empty string removes the stored contact.
    #[validate(length(max = 100))]
    pub contact: Option<String>,
}

impl From<UpdateIdentityDto> for ProfileChanges {
    fn from(dto: UpdateIdentityDto) -> Self {
        ProfileChanges {
            name: dto.name.map(|n| n.trim().to_string()),
            contact: dto.contact.map(|c| c.trim().to_string()),
        }
    }
}

/// DTO for an administrative password reset.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordDto {
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}
