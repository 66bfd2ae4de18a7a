//! Password hashing

use crate::error::Result;

/// bcrypt cost factor for new hashes
const BCRYPT_COST: u32 = 12;

/// Hash a plaintext password with a per-hash random salt
pub fn hash_password(plain: &str) -> Result<String> {
    Ok(bcrypt::hash(plain, BCRYPT_COST)?)
}

/// Verify a plaintext password against a stored hash.
///
/// A malformed stored hash counts as a failed verification, never an error.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}

/// Hash on the blocking pool so request tasks stay schedulable
pub async fn hash_password_blocking(plain: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .map_err(|e| crate::error::Error::Other(e.to_string()))?
}

/// Verify on the blocking pool so request tasks stay schedulable
pub async fn verify_password_blocking(plain: String, hash: String) -> bool {
    tokio::task::spawn_blocking(move || verify_password(&plain, &hash))
        .await
        .unwrap_or(false)
}
