//! HMAC-signed session tokens.
//!
//! Token form: `base64url(claims json).hex(hmac-sha256 signature)`.
//! The signing key is a random 32-byte file in the data directory,
//! created on first use.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::path::Path;

use super::constant_time_eq;
use crate::error::{AuthError, Result};
use crate::storage::data_dir;

type HmacSha256 = Hmac<Sha256>;

/// File name of the signing key inside the data directory.
const KEY_FILE: &str = "secret.key";
const KEY_LEN: usize = 32;

/// Signed token payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    /// Account the session belongs to
    pub user_id: String,
    /// Expiry instant; tokens past this fail verification
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies session tokens with a process-wide key.
#[derive(Clone)]
pub struct TokenSigner {
    key: Vec<u8>,
}

impl TokenSigner {
    /// Build a signer around an explicit key (for tests and embedding).
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }

    /// Load the signing key from the data directory, generating it first
    /// if this is the first run.
    pub fn load_or_create() -> Result<Self> {
        let path = data_dir()?.join(KEY_FILE);
        Self::load_or_create_at(&path)
    }

    /// Load or create a signing key at an explicit path.
    pub fn load_or_create_at(path: &Path) -> Result<Self> {
        if path.exists() {
            let key = std::fs::read(path)
                .map_err(|e| AuthError::KeyLoadFailed(e.to_string()))?;
            if key.len() < KEY_LEN {
                return Err(AuthError::KeyLoadFailed(format!(
                    "key file {} is too short",
                    path.display()
                ))
                .into());
            }
            return Ok(Self::new(key));
        }

        let mut key = vec![0u8; KEY_LEN];
        rand::thread_rng().fill_bytes(&mut key);
        std::fs::write(path, &key).map_err(|e| AuthError::KeyLoadFailed(e.to_string()))?;
        Ok(Self::new(key))
    }

    /// Issue a token for a user, valid for `ttl` from now.
    pub fn issue(&self, user_id: &str, ttl: Duration) -> Result<String> {
        let claims = TokenClaims {
            user_id: user_id.to_string(),
            expires_at: Utc::now() + ttl,
        };
        let payload = serde_json::to_vec(&claims)?;
        let encoded = URL_SAFE_NO_PAD.encode(&payload);
        let signature = self.sign(encoded.as_bytes());
        Ok(format!("{encoded}.{signature}"))
    }

    /// Verify a token's signature and expiry, returning its claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let (encoded, signature) = token.rsplit_once('.').ok_or(AuthError::TokenInvalid)?;

        let expected = self.sign(encoded.as_bytes());
        if !constant_time_eq(signature.as_bytes(), expected.as_bytes()) {
            return Err(AuthError::TokenInvalid);
        }

        let payload = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| AuthError::TokenInvalid)?;
        let claims: TokenClaims =
            serde_json::from_slice(&payload).map_err(|_| AuthError::TokenInvalid)?;

        if claims.expires_at < Utc::now() {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }

    fn sign(&self, data: &[u8]) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC accepts keys of any length");
        mac.update(data);
        hex::encode(mac.finalize().into_bytes())
    }
}
