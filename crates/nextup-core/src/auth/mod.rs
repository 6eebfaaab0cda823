//! Credential and session handling.
//!
//! Two independent pieces: salted PBKDF2-HMAC-SHA256 password storage and
//! HMAC-signed bearer tokens for sessions. Both use constant-time
//! comparisons when checking attacker-supplied material.

mod password;
mod token;

pub use password::{hash_password, verify_password};
pub use token::{TokenClaims, TokenSigner};

/// Constant-time byte comparison to prevent timing attacks.
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
