//! Password hashing and token generation for devlink.

use rand_core::RngCore;
use thiserror::Error;
use zeroize::Zeroizing;

const MIB: u32 = 1024;
const MEMORY_COST_KIB: u32 = 64 * MIB;

/// Salt length for password hashing (bytes).
pub const SALT_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum KdfError {
    #[error("invalid kdf parameters")]
    InvalidParams(argon2::Error),
    #[error("key derivation failed")]
    DerivationFailed(argon2::Error),
}

/// Hash a password using Argon2id with a per-user salt.
/// Returns a hex-encoded 32-byte hash.
pub fn hash_password(password: &str, salt: &[u8]) -> Result<String, KdfError> {
    let params =
        argon2::Params::new(MEMORY_COST_KIB, 3, 1, Some(32)).map_err(KdfError::InvalidParams)?;

    let argon2 = argon2::Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let mut hash = Zeroizing::new([0u8; 32]);

    argon2
        .hash_password_into(password.as_bytes(), salt, hash.as_mut())
        .map_err(KdfError::DerivationFailed)?;

    Ok(hex::encode(hash.as_ref()))
}

/// Verify a password against a stored hex-encoded hash.
pub fn verify_password(password: &str, salt: &[u8], stored_hash: &str) -> Result<bool, KdfError> {
    let computed = hash_password(password, salt)?;
    Ok(computed == stored_hash)
}

/// Generate a random salt for password hashing.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand_core::OsRng.fill_bytes(&mut salt);
    salt
}

/// Generate a random session token (32 bytes = 256 bits, hex-encoded).
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand_core::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
