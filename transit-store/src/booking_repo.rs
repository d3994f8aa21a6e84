use async_trait::async_trait;
use sqlx::PgPool;
use transit_core::{Booking, BookingRepository, StoreResult};

use crate::database::store_error;

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: i32,
    user_id: i32,
    trip_id: i32,
    seats: Vec<String>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: row.id,
            user_id: row.user_id,
            trip_id: row.trip_id,
            seats: row.seats,
        }
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create_booking(&self, user_id: i32, trip_id: i32, seats: &[String]) -> StoreResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO bookings (user_id, trip_id, seats) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(user_id)
        .bind(trip_id)
        .bind(seats)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(id)
    }

    async fn list_bookings_for_user(&self, user_id: i32) -> StoreResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(
            "SELECT id, user_id, trip_id, seats FROM bookings WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }
}
