/// Credential Hasher
///
/// One-way, salted password transform used for storage and verification.

use bcrypt::{hash, verify};

use crate::error::AppError;

/// bcrypt work factor for all stored credentials.
const HASH_COST: u32 = 12;

/// Hash a plaintext password for storage.
///
/// # Errors
/// Returns an error if bcrypt hashing fails.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    Ok(hash(password, HASH_COST)?)
}

/// Verify a plaintext candidate against a stored hash.
///
/// A mismatch is not an error: it returns `Ok(false)`. Only a failure of the
/// verification machinery itself is surfaced as an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    Ok(verify(password, hash)?)
}
