use bcrypt::{hash, verify, DEFAULT_COST};
use tracing::warn;

use crate::shared::AppError;

/// Hashes a plaintext password with bcrypt. The salt is embedded in the
/// returned hash string.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST).map_err(|e| {
        warn!(error = %e, "Failed to hash password");
        AppError::Internal
    })
}

/// Verifies a plaintext password against a stored bcrypt hash
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    verify(password, password_hash).map_err(|e| {
        warn!(error = %e, "Failed to verify password hash");
        AppError::Internal
    })
}
