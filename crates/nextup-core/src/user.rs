//! User account record.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ValidationError;

/// A registered account. One user owns many tasks.
///
/// Only serialized outward (API responses); rows are rebuilt from storage,
/// so no `Deserialize` and the password hash can stay out of the wire shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier
    pub id: String,
    /// Login email, stored lowercase
    pub email: String,
    /// Encoded password hash, never serialized into responses
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Registration timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh id. The email is lowercased.
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.into().to_lowercase(),
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        }
    }
}

/// Minimal email shape check: something, an @, something, a dot, something.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("email"));
    }
    let valid = trimmed.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && domain.split_once('.').is_some_and(|(host, tld)| {
                !host.is_empty() && !tld.is_empty()
            })
    });
    if !valid {
        return Err(ValidationError::InvalidValue {
            field: "email",
            message: "must be a valid email address".to_string(),
        });
    }
    Ok(())
}
