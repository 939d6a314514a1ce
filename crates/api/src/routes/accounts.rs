use auth::{MIN_PASSWORD_LEN, hash_password, is_valid_email, verify_password};
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use store::StoreError;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub token: String,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = store::normalize(&req.email);
    if !is_valid_email(&email) {
        return Err(ApiError::bad_request("Invalid email address"));
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(
            "Password must be at least 6 characters long",
        ));
    }
    let name = req.name.trim().to_string();

    let hash = hash_password(&req.password)
        .map_err(|e| ApiError::internal(format!("Registration failed: {e}")))?;

    let user_id = match state.store.create_user(&email, &hash, &name).await {
        Ok(id) => id,
        Err(StoreError::AlreadyExists) => {
            return Err(ApiError::conflict("User with this email already exists"));
        }
        Err(e) => return Err(ApiError::internal(format!("Registration failed: {e}"))),
    };

    let token = state
        .tokens
        .issue(&user_id)
        .map_err(|e| ApiError::internal(format!("Registration failed: {e}")))?;

    info!(%email, %user_id, "user created");

    Ok(Json(AuthResponse {
        message: "User created successfully".to_string(),
        user_id,
        email,
        name,
        token,
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = store::normalize(&req.email);

    let user = state
        .store
        .find_user_by_email(&email)
        .await
        .map_err(|e| ApiError::internal(format!("Login failed: {e}")))?;

    let user = match user {
        Some(u) if verify_password(&req.password, &u.password_hash) => u,
        _ => return Err(ApiError::unauthorized("Invalid email or password")),
    };

    let token = state
        .tokens
        .issue(&user.user_id)
        .map_err(|e| ApiError::internal(format!("Login failed: {e}")))?;

    state
        .store
        .touch_login(&user.user_id)
        .await
        .map_err(|e| ApiError::internal(format!("Login failed: {e}")))?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user_id: user.user_id,
        email: user.email,
        name: user.name,
        token,
    }))
}
