use axum::{extract::State, routing::get, Json, Router};
use transit_core::{Claims, Profile};

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/profile", get(get_profile))
}

async fn get_profile(claims: Claims, State(state): State<AppState>) -> Result<Json<Profile>, AppError> {
    Ok(Json(state.profile_service.profile(&claims).await?))
}
