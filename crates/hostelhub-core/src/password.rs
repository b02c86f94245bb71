//! Password hashing and verification.
//!
//! Secrets are hashed with bcrypt at a fixed work factor. A stored hash is
//! carried around as a [`HashedSecret`], which can only come from hashing a
//! plaintext or from loading an already-stored value. Code that holds a
//! `HashedSecret` therefore never hashes it again, and code that holds a
//! plaintext `&str` never writes it to storage without hashing first.

use std::fmt;
use std::sync::LazyLock;

use bcrypt::{hash, verify};

use crate::errors::AppError;

/// Work factor used for every stored secret.
pub const BCRYPT_COST: u32 = 12;

/// A one-way hashed secret, safe to persist.
///
/// Deliberately not `Serialize`; its `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedSecret(String);

impl HashedSecret {
    /// Wraps a hash read back from the credential store.
    pub fn from_stored(stored: impl Into<String>) -> Self {
        Self(stored.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for HashedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedSecret(<redacted>)")
    }
}

pub fn hash_password(password: &str) -> Result<HashedSecret, AppError> {
    hash_password_with_cost(password, BCRYPT_COST)
}

/// Hashes with an explicit cost. Tests use a low cost to stay fast.
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<HashedSecret, AppError> {
    hash(password, cost)
        .map(HashedSecret)
        .map_err(|e| AppError::internal_error(format!("Failed to hash password: {}", e)))
}

/// Returns `true` iff `password` matches `hashed`.
///
/// A malformed stored hash is treated as a mismatch.
pub fn verify_password(password: &str, hashed: &HashedSecret) -> bool {
    match verify(password, hashed.as_str()) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is malformed");
            false
        }
    }
}

static DUMMY_HASH: LazyLock<Option<HashedSecret>> =
    LazyLock::new(|| hash_password("hostelhub-timing-equalizer").ok());

/// Burns the same bcrypt work as a real verification and always fails.
///
/// Called when a login names an unknown handle so that the response time
/// matches the wrong-password path.
pub fn verify_against_dummy(password: &str) -> bool {
    if let Some(dummy) = DUMMY_HASH.as_ref() {
        let _ = verify_password(password, dummy);
    }
    false
}
