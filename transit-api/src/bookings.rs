use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use transit_core::{Booking, BookingRequest, Claims};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Serialize)]
struct BookingResponse {
    message: String,
    booking: Booking,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/bookings", post(create_booking))
}

async fn create_booking(
    claims: Claims,
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<BookingRequest>, AppError>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state.booking_service.create_booking(&claims, req).await?;

    Ok(Json(BookingResponse {
        message: "Booking created successfully".to_string(),
        booking,
    }))
}
