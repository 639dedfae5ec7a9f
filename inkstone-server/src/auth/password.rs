//! Argon2 password hashing
//!
//! Hashing is CPU-bound, so both directions run on the blocking pool
//! instead of stalling the request executor.

use rand::RngCore;
use tokio::task;

use super::AuthError;

/// Hash a plaintext password into an encoded argon2 string
/// (`$argon2i$...`) that carries its own salt and parameters.
pub async fn hash(password: &str) -> Result<String, AuthError> {
    let password = password.as_bytes().to_vec();

    task::spawn_blocking(move || {
        let mut salt = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);
        argon2::hash_encoded(&password, &salt, &argon2::Config::default())
    })
    .await
    .map_err(|_| AuthError::Hash)?
    .map_err(|_| AuthError::Hash)
}

/// Verify a plaintext password against a stored encoded hash.
///
/// A malformed stored hash verifies as `false` rather than erroring:
/// a row with a corrupt hash behaves like a wrong password.
pub async fn verify(encoded: &str, password: &str) -> Result<bool, AuthError> {
    let encoded = encoded.to_owned();
    let password = password.as_bytes().to_vec();

    task::spawn_blocking(move || argon2::verify_encoded(&encoded, &password).unwrap_or(false))
        .await
        .map_err(|_| AuthError::Hash)
}
