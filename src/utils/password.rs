//! bcrypt work moved off the async executor.
//!
//! Hashing at cost 12 takes a noticeable fraction of a second; running it
//! on a Tokio worker would stall every other request scheduled there.

use hostelhub_core::password::verify_against_dummy;
use hostelhub_core::{AppError, HashedSecret, hash_password, verify_password};
use tokio::task::spawn_blocking;

pub async fn hash_secret(password: String) -> Result<HashedSecret, AppError> {
    spawn_blocking(move || hash_password(&password))
        .await
        .map_err(AppError::internal)?
}

/// Returns `false` if the hash does not match or the worker task failed.
pub async fn verify_secret(password: String, hashed: HashedSecret) -> bool {
    match spawn_blocking(move || verify_password(&password, &hashed)).await {
        Ok(matches) => matches,
        Err(e) => {
            tracing::error!(error = %e, "Password verification task failed");
            false
        }
    }
}

/// Performs a full verification against a fixed hash and discards the result.
pub async fn verify_dummy_secret(password: String) {
    let _ = spawn_blocking(move || verify_against_dummy(&password)).await;
}
