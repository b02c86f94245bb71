//! Session token configuration.
//!
//! # Environment Variables
//!
//! - `JWT_SECRET`: HMAC signing secret (required, at least 32 bytes)
//! - `JWT_EXPIRY`: token lifetime in seconds (default: 86400, 24 hours; at
//!   most one year)
//!
//! There is no built-in fallback secret. A server without `JWT_SECRET`
//! refuses to start.

use std::env;
use std::fmt;

use crate::ConfigError;

pub const MIN_SECRET_LEN: usize = 32;
pub const DEFAULT_TOKEN_EXPIRY_SECS: i64 = 86_400;
pub const MAX_TOKEN_EXPIRY_SECS: i64 = 365 * 86_400;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in seconds.
    pub token_expiry: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("token_expiry", &self.token_expiry)
            .finish()
    }
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, token_expiry: i64) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                key: "JWT_SECRET",
                reason: format!("must be at least {} bytes", MIN_SECRET_LEN),
            });
        }
        if token_expiry <= 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRY",
                reason: "must be a positive number of seconds".to_string(),
            });
        }
        if token_expiry > MAX_TOKEN_EXPIRY_SECS {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRY",
                reason: format!("must be at most {} seconds", MAX_TOKEN_EXPIRY_SECS),
            });
        }
        Ok(Self {
            secret,
            token_expiry,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let token_expiry = match lookup("JWT_EXPIRY") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "JWT_EXPIRY",
                reason: format!("`{}` is not an integer", raw),
            })?,
            None => DEFAULT_TOKEN_EXPIRY_SECS,
        };

        Self::new(secret, token_expiry)
    }
}
