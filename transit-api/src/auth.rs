use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use tracing::info;
use transit_core::NewUser;
use transit_shared::pii::{mask_email, Masked};

use crate::{error::AppError, state::AppState};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Deserialize)]
struct SignupRequest {
    #[serde(default)]
    name: String,
    email: String,
    password: Masked<String>,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: Masked<String>,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    token: String,
    name: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
}

async fn signup(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<SignupRequest>, AppError>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = req.email.trim().to_string();
    if email.is_empty() || req.password.expose().is_empty() {
        return Err(AppError::ValidationError("Email and password are required".to_string()));
    }

    let existing = state.users.find_user_by_email(&email).await.map_err(|e| {
        AppError::InternalServerError(format!("Database error: {}", e))
    })?;
    if existing.is_some() {
        return Err(AppError::ConflictError("User already exists".to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.expose().as_bytes(), &salt)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))?
        .to_string();

    // A concurrent signup for the same e-mail surfaces here as a unique violation.
    let user_id = state
        .users
        .create_user(&NewUser {
            name: req.name,
            email: email.clone(),
            password_hash,
        })
        .await
        .map_err(transit_core::CoreError::from)?;

    info!(user_id, email = %mask_email(&email), "User registered");

    Ok(Json(MessageResponse {
        message: "User registered successfully".to_string(),
    }))
}

async fn login(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = state
        .users
        .find_user_by_email(req.email.trim())
        .await
        .map_err(|e| AppError::InternalServerError(format!("Database error: {}", e)))?
        .ok_or_else(|| AppError::AuthenticationError(INVALID_CREDENTIALS.to_string()))?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| AppError::InternalServerError(format!("Stored hash unreadable: {}", e)))?;

    Argon2::default()
        .verify_password(req.password.expose().as_bytes(), &parsed_hash)
        .map_err(|_| AppError::AuthenticationError(INVALID_CREDENTIALS.to_string()))?;

    let token = state.tokens.issue(&user.email)?;

    info!(user_id = user.id, "Login successful");

    Ok(Json(LoginResponse {
        token,
        name: user.name,
    }))
}
