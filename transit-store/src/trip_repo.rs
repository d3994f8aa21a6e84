use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::types::Json;
use sqlx::PgPool;
use transit_core::{Review, StoreResult, Trip, TripRepository, TripSearch};

use crate::database::store_error;

pub struct PgTripRepository {
    pool: PgPool,
}

impl PgTripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TripRow {
    id: i32,
    from: String,
    to: String,
    date: NaiveDate,
    departure_time: String,
    arrival_time: String,
    price: f64,
    seats_available: i32,
    bus_operator: String,
    duration: String,
    seats: Vec<String>,
    amenities: Vec<String>,
    intermediate_stops: Vec<String>,
    reviews: Json<Vec<Review>>,
}

impl From<TripRow> for Trip {
    fn from(row: TripRow) -> Self {
        Trip {
            id: row.id,
            from: row.from,
            to: row.to,
            date: row.date,
            departure_time: row.departure_time,
            arrival_time: row.arrival_time,
            price: row.price,
            seats_available: row.seats_available,
            bus_operator: row.bus_operator,
            duration: row.duration,
            seats: row.seats,
            amenities: row.amenities,
            intermediate_stops: row.intermediate_stops,
            reviews: row.reviews.0,
        }
    }
}

const TRIP_COLUMNS: &str = r#"id, "from", "to", date, departure_time, arrival_time, price,
    seats_available, bus_operator, duration, seats, amenities, intermediate_stops, reviews"#;

#[async_trait]
impl TripRepository for PgTripRepository {
    async fn get_trip(&self, id: i32) -> StoreResult<Option<Trip>> {
        let sql = format!("SELECT {} FROM trips WHERE id = $1", TRIP_COLUMNS);
        let row = sqlx::query_as::<_, TripRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(row.map(Trip::from))
    }

    async fn search_trips(&self, search: &TripSearch) -> StoreResult<Vec<Trip>> {
        let (start, end) = match search.date_window() {
            Some((start, end)) => (Some(start), Some(end)),
            None => (None, None),
        };

        let sql = format!(
            r#"
            SELECT {}
            FROM trips
            WHERE LOWER("from") = LOWER($1)
              AND LOWER("to") = LOWER($2)
              AND ($3::date IS NULL OR date BETWEEN $3 AND $4)
            ORDER BY date, id
            "#,
            TRIP_COLUMNS
        );

        let rows = sqlx::query_as::<_, TripRow>(&sql)
            .bind(&search.from)
            .bind(&search.to)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(rows.into_iter().map(Trip::from).collect())
    }

    async fn update_trip_seats(
        &self,
        trip_id: i32,
        seats: &[String],
        seats_available: i32,
    ) -> StoreResult<()> {
        sqlx::query("UPDATE trips SET seats = $1, seats_available = $2 WHERE id = $3")
            .bind(seats)
            .bind(seats_available)
            .bind(trip_id)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(())
    }
}
