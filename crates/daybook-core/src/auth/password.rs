//! Password hashing with Argon2id.
//!
//! Stored form is `hex(salt)$hex(digest)` with a random 16-byte salt per
//! password. Parameters follow the low-memory interactive profile
//! (19 MiB, t=2, p=1).

use argon2::{Algorithm, Argon2, Params, Version};

use crate::error::AuthError;

const M_COST: u32 = 19456; // 19 MiB in KiB
const T_COST: u32 = 2;
const P_COST: u32 = 1;
const OUTPUT_LEN: usize = 32;
const SALT_LEN: usize = 16;

/// Hash a password with a fresh random salt.
///
/// # Errors
/// Fails only if the Argon2 parameters are rejected.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = generate_salt();
    let digest = derive(password.as_bytes(), &salt)?;
    Ok(format!("{}${}", hex::encode(salt), hex::encode(digest)))
}

/// Check a password against a stored `hex(salt)$hex(digest)` value.
///
/// Malformed stored values verify as false rather than erroring, so a
/// corrupted row behaves like a wrong password.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest_hex)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let Ok(expected) = hex::decode(digest_hex) else {
        return false;
    };
    let Ok(actual) = derive(password.as_bytes(), &salt) else {
        return false;
    };

    if expected.len() != actual.len() {
        return false;
    }

    // Constant-time comparison to prevent timing attacks
    let mut result = 0u8;
    for (a, b) in expected.iter().zip(actual.iter()) {
        result |= a ^ b;
    }
    result == 0
}

fn derive(password: &[u8], salt: &[u8]) -> Result<[u8; OUTPUT_LEN], AuthError> {
    let params = Params::new(M_COST, T_COST, P_COST, Some(OUTPUT_LEN))
        .map_err(|e| AuthError::KeyDerivation(e.to_string()))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut output = [0u8; OUTPUT_LEN];
    argon2
        .hash_password_into(password, salt, &mut output)
        .map_err(|e| AuthError::KeyDerivation(e.to_string()))?;

    Ok(output)
}

/// Generate a random 16-byte salt.
fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_verifies() {
        let stored = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &stored));
        assert!(!verify_password("hunter3", &stored));
    }

    #[test]
    fn same_password_hashes_differently() {
        let a = hash_password("hunter2").unwrap();
        let b = hash_password("hunter2").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_stored_value_fails_closed() {
        assert!(!verify_password("hunter2", ""));
        assert!(!verify_password("hunter2", "no-separator"));
        assert!(!verify_password("hunter2", "nothex$nothex"));
    }
}
