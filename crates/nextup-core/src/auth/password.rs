//! Password hashing with salted PBKDF2-HMAC-SHA256.
//!
//! Encoded form: `pbkdf2-sha256$<iterations>$<salt hex>$<hash hex>`.
//! The iteration count is stored per hash, so it can be raised later
//! without invalidating existing accounts.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

use super::constant_time_eq;
use crate::error::AuthError;

type HmacSha256 = Hmac<Sha256>;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const DEFAULT_ITERATIONS: u32 = 10_000;

/// One-block PBKDF2 with HMAC-SHA256 (32-byte output).
fn pbkdf2_sha256(password: &[u8], salt: &[u8], iterations: u32) -> [u8; 32] {
    let mut mac =
        HmacSha256::new_from_slice(password).expect("HMAC accepts keys of any length");
    mac.update(salt);
    mac.update(&1u32.to_be_bytes());
    let mut block: [u8; 32] = mac.finalize().into_bytes().into();
    let mut derived = block;

    for _ in 1..iterations {
        let mut mac =
            HmacSha256::new_from_slice(password).expect("HMAC accepts keys of any length");
        mac.update(&block);
        block = mac.finalize().into_bytes().into();
        for (d, b) in derived.iter_mut().zip(block.iter()) {
            *d ^= b;
        }
    }

    derived
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);

    let hash = pbkdf2_sha256(password.as_bytes(), &salt, DEFAULT_ITERATIONS);
    format!(
        "{SCHEME}${DEFAULT_ITERATIONS}${}${}",
        hex::encode(salt),
        hex::encode(hash)
    )
}

/// Check a password against an encoded hash in constant time.
///
/// # Errors
/// Returns `AuthError::MalformedHash` when the stored value does not parse;
/// a wrong password is `Ok(false)`, not an error.
pub fn verify_password(password: &str, encoded: &str) -> Result<bool, AuthError> {
    let mut parts = encoded.split('$');
    let scheme = parts.next().ok_or(AuthError::MalformedHash)?;
    if scheme != SCHEME {
        return Err(AuthError::MalformedHash);
    }
    let iterations: u32 = parts
        .next()
        .and_then(|s| s.parse().ok())
        .filter(|&n| n > 0)
        .ok_or(AuthError::MalformedHash)?;
    let salt = parts
        .next()
        .and_then(|s| hex::decode(s).ok())
        .ok_or(AuthError::MalformedHash)?;
    let expected = parts
        .next()
        .and_then(|s| hex::decode(s).ok())
        .ok_or(AuthError::MalformedHash)?;
    if parts.next().is_some() {
        return Err(AuthError::MalformedHash);
    }

    let actual = pbkdf2_sha256(password.as_bytes(), &salt, iterations);
    Ok(constant_time_eq(&actual, &expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_verifies() {
        let encoded = hash_password("hunter2");
        assert!(verify_password("hunter2", &encoded).unwrap());
    }

    #[test]
    fn wrong_password_fails_without_error() {
        let encoded = hash_password("hunter2");
        assert!(!verify_password("hunter3", &encoded).unwrap());
        assert!(!verify_password("", &encoded).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same-password");
        let b = hash_password("same-password");
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_an_error_not_a_match() {
        assert!(matches!(
            verify_password("x", "not-a-hash"),
            Err(AuthError::MalformedHash)
        ));
        assert!(matches!(
            verify_password("x", "pbkdf2-sha256$0$aa$bb"),
            Err(AuthError::MalformedHash)
        ));
        assert!(matches!(
            verify_password("x", "pbkdf2-sha256$1000$zz$bb"),
            Err(AuthError::MalformedHash)
        ));
        // Empty-hash accounts (the CLI's local user) never verify.
        assert!(matches!(
            verify_password("x", ""),
            Err(AuthError::MalformedHash)
        ));
    }

    #[test]
    fn iteration_count_is_read_from_the_encoded_form() {
        let hash = pbkdf2_sha256(b"pw", b"salt", 100);
        let encoded = format!("pbkdf2-sha256$100${}${}", hex::encode(b"salt"), hex::encode(hash));
        assert!(verify_password("pw", &encoded).unwrap());
    }
}
