//! Account registration, login, and the current-user endpoint.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

use nextup_core::auth::{hash_password, verify_password};
use nextup_core::user::{validate_email, User};

use super::authenticate;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: User,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub user: User,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    validate_email(&body.email)?;
    if body.password.is_empty() {
        return Err(ApiError::bad_request("Password is required"));
    }

    let user = {
        let db = state.db()?;
        if db.find_user_by_email(&body.email)?.is_some() {
            return Err(ApiError::bad_request(
                "An account with this email already exists",
            ));
        }
        let user = User::new(body.email, hash_password(&body.password));
        db.create_user(&user)?;
        user
    };

    let token = state.signer.issue(&user.id, state.token_ttl)?;
    tracing::info!(user_id = %user.id, "account created");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Account created successfully".to_string(),
            token,
            user,
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = {
        let db = state.db()?;
        db.find_user_by_email(&body.email)?
    };
    // Unknown email and wrong password are indistinguishable to the client.
    let Some(user) = user else {
        return Err(ApiError::unauthorized("Invalid email or password"));
    };
    let ok = verify_password(&body.password, &user.password_hash).unwrap_or(false);
    if !ok {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let token = state.signer.issue(&user.id, state.token_ttl)?;
    Ok(Json(AuthResponse {
        message: "Welcome back".to_string(),
        token,
        user,
    }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MeResponse>, ApiError> {
    let user_id = authenticate(&state, &headers)?;
    let user = state
        .db()?
        .get_user(&user_id)?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(MeResponse { user }))
}
