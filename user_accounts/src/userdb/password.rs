use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};

use crate::utils::gen_random_bytes;

use super::errors::UserError;

const SALT_LEN: usize = 16;

/// Hash a password into an Argon2 PHC string
pub(crate) fn hash_password(password: &str) -> Result<String, UserError> {
    let salt_bytes =
        gen_random_bytes(SALT_LEN).map_err(|e| UserError::Credential(e.to_string()))?;
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|e| UserError::Credential(e.to_string()))?;

    let digest = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| UserError::Credential(e.to_string()))?;

    Ok(digest.to_string())
}

/// Check a password against a stored digest
///
/// A digest that cannot be parsed never verifies.
pub(crate) fn verify_password(password: &str, digest: &str) -> bool {
    let parsed = match PasswordHash::new(digest) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Stored password digest is malformed: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
