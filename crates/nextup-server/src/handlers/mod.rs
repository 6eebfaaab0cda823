//! Request handlers, grouped the way the routes are.

pub mod auth;
pub mod tasks;

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

use crate::error::ApiError;
use crate::state::AppState;

/// Resolve the bearer token to a user id, or fail with 401.
pub fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<String, ApiError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let claims = state
        .signer
        .verify(token)
        .map_err(|_| ApiError::unauthorized("Invalid or expired session"))?;
    Ok(claims.user_id)
}
