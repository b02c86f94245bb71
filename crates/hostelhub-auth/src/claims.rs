//! JWT claim structure for session tokens.

use hostelhub_core::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::jwt::TokenError;

/// Claims embedded in every session token.
///
/// The role claim is trusted once the signature checks out; it is not
/// re-read from the credential store on each request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Identity ID (subject claim)
    pub sub: String,
    /// Role of the identity at issuance
    pub role: Role,
    /// Issued-at (Unix timestamp, seconds)
    pub iat: i64,
    /// Expiry (Unix timestamp, seconds)
    pub exp: i64,
}

impl Claims {
    pub fn subject_id(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.sub).map_err(|_| TokenError::Malformed)
    }
}
