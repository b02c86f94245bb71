//! Session token issuance and verification.
//!
//! Tokens are HS256 JWTs signed with the server-held secret from
//! [`JwtConfig`]. They carry the identity ID and role, and expire after the
//! configured lifetime. There is no revocation list; expiry is the only way
//! a token stops being valid.
//!
//! Verification checks the signature first, then expiry. A token is valid
//! while `now < exp` and expired from `exp` onwards, with no leeway for
//! clock skew.
//!
//! # Example
//!
//! ```ignore
//! use hostelhub_auth::TokenIssuer;
//! use hostelhub_config::JwtConfig;
//! use hostelhub_core::Role;
//!
//! let issuer = TokenIssuer::new(&JwtConfig::from_env()?);
//! let issued = issuer.issue(identity_id, Role::Staff)?;
//! let claims = issuer.verify(&issued.token)?;
//! assert_eq!(claims.role, Role::Staff);
//! ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use hostelhub_config::JwtConfig;
use hostelhub_config::jwt::MAX_TOKEN_EXPIRY_SECS;
use hostelhub_core::{AuthError, Role};

use crate::claims::Claims;

/// Why a token failed to issue or verify.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token could not be parsed")]
    Malformed,

    #[error("token signature does not match")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("failed to encode token: {0}")]
    Encoding(String),
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed | TokenError::Encoding(_) => AuthError::TokenMalformed,
            TokenError::InvalidSignature => AuthError::TokenSignatureInvalid,
            TokenError::Expired => AuthError::TokenExpired,
        }
    }
}

/// A freshly minted token together with its expiry instant.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Mints and validates session tokens.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// The lifetime is clamped to `1..=MAX_TOKEN_EXPIRY_SECS` for configs
    /// built without [`JwtConfig::new`].
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl: Duration::seconds(config.token_expiry.clamp(1, MAX_TOKEN_EXPIRY_SECS)),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token with the configured lifetime, starting now.
    pub fn issue(&self, subject: Uuid, role: Role) -> Result<IssuedToken, TokenError> {
        self.issue_with_ttl(subject, role, self.ttl, Utc::now())
    }

    pub fn issue_with_ttl(
        &self,
        subject: Uuid,
        role: Role,
        ttl: Duration,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Encoding("token expiry is out of range".to_string()))?;
        let claims = Claims {
            sub: subject.to_string(),
            role,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verifies a token against the current time.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against the caller's clock.
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                _ => TokenError::Malformed,
            })?;

        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
