//! Bearer token issuing and verification.
//!
//! Tokens are `base64url(user_id).expires_unix.hex(hmac_sha256)` with the
//! signature computed over the first two segments. The user id segment is
//! base64url-encoded so the dot separators stay unambiguous.

use chrono::{DateTime, Utc};

use crate::error::AuthError;

/// Derive the token signing key from a configured secret.
pub fn signing_key(secret: &str) -> Vec<u8> {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(b"daybook-token-key-v1");
    hasher.finalize().to_vec()
}

/// Issue a signed bearer token for `user_id` expiring at `expires_at`.
pub fn issue(key: &[u8], user_id: &str, expires_at: DateTime<Utc>) -> String {
    use base64::prelude::*;

    let id = BASE64_URL_SAFE_NO_PAD.encode(user_id.as_bytes());
    let payload = format!("{}.{}", id, expires_at.timestamp());
    let signature = sign(key, &payload);
    format!("{}.{}", payload, signature)
}

/// Verify a bearer token and return the user id it names.
///
/// # Errors
/// Structural problems, signature mismatches and expiry all collapse into
/// `InvalidToken`; callers cannot distinguish them and neither can clients.
pub fn verify(key: &[u8], token: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
    use base64::prelude::*;

    let mut parts = token.split('.');
    let (Some(id), Some(expiry), Some(signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(AuthError::InvalidToken);
    };

    let payload = format!("{}.{}", id, expiry);
    let expected = sign(key, &payload);

    if signature.len() != expected.len() {
        return Err(AuthError::InvalidToken);
    }

    // Constant-time comparison to prevent timing attacks
    let mut diff = 0u8;
    for (a, b) in signature.bytes().zip(expected.bytes()) {
        diff |= a ^ b;
    }
    if diff != 0 {
        return Err(AuthError::InvalidToken);
    }

    let expires_unix: i64 = expiry.parse().map_err(|_| AuthError::InvalidToken)?;
    if now.timestamp() >= expires_unix {
        return Err(AuthError::InvalidToken);
    }

    let raw = BASE64_URL_SAFE_NO_PAD
        .decode(id)
        .map_err(|_| AuthError::InvalidToken)?;
    String::from_utf8(raw).map_err(|_| AuthError::InvalidToken)
}

fn sign(key: &[u8], payload: &str) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take keys of any size");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
