use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use chrono::NaiveDate;
use serde::Deserialize;
use transit_core::{Claims, Trip, TripSearch};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchParams {
    #[serde(default)]
    from: String,
    #[serde(default)]
    to: String,
    date: Option<String>,
    flexible_date_range: Option<String>,
    currency: Option<String>,
}

impl SearchParams {
    fn into_search(self) -> Result<TripSearch, AppError> {
        let mut search = TripSearch::new(self.from, self.to);

        if let Some(date) = self.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            let date = date
                .parse::<NaiveDate>()
                .map_err(|_| AppError::ValidationError(format!("Invalid date: {}", date)))?;
            search = search.on(date);
        }

        // Anything that is not a positive day count means an exact-date search.
        let days = self
            .flexible_date_range
            .as_deref()
            .and_then(|n| n.trim().parse::<u32>().ok())
            .unwrap_or(0);

        Ok(search.flexible(days))
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/trips/search", get(search_trips))
        .route("/api/trips/{id}", get(get_trip))
}

async fn search_trips(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<SearchParams>, AppError>,
) -> Result<Json<Vec<Trip>>, AppError> {
    if let Some(currency) = params.currency.as_deref().filter(|c| !c.eq_ignore_ascii_case("USD")) {
        tracing::debug!(currency, "Currency conversion not supported, returning base prices");
    }

    let search = params.into_search()?;
    let trips = state.trips.search_trips(&search).await.map_err(|e| {
        AppError::InternalServerError(format!("Failed to search trips: {}", e))
    })?;

    tracing::info!(
        from = %search.from,
        to = %search.to,
        results = trips.len(),
        "Trip search"
    );

    Ok(Json(trips))
}

async fn get_trip(
    _claims: Claims,
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> Result<Json<Trip>, AppError> {
    let trip = state
        .trips
        .get_trip(id)
        .await
        .map_err(|e| AppError::InternalServerError(format!("Database error: {}", e)))?
        .ok_or_else(|| AppError::NotFoundError("Trip not found".to_string()))?;

    Ok(Json(trip))
}
