use async_trait::async_trait;

use crate::models::{Booking, NewUser, Trip, User};
use crate::search::TripSearch;

/// Failure raised by a repository.
///
/// A missing row is not an error: lookups return `Ok(None)` so callers can pick
/// the outcome (`NotFound`, `Unauthenticated`, ...) that fits the operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error(transparent)]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        StoreError::Backend(msg.into().into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Repository trait for user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user and returns its id. A taken e-mail yields `UniqueViolation`.
    async fn create_user(&self, user: &NewUser) -> StoreResult<i32>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}

/// Repository trait for trips and their seat inventory
#[async_trait]
pub trait TripRepository: Send + Sync {
    async fn get_trip(&self, id: i32) -> StoreResult<Option<Trip>>;

    async fn search_trips(&self, search: &TripSearch) -> StoreResult<Vec<Trip>>;

    /// Overwrites the inventory of a trip. Unconditional: no version or
    /// previous-value check is made.
    async fn update_trip_seats(
        &self,
        trip_id: i32,
        seats: &[String],
        seats_available: i32,
    ) -> StoreResult<()>;
}

/// Repository trait for bookings
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts a booking row and returns its id. The trip id is not checked.
    async fn create_booking(&self, user_id: i32, trip_id: i32, seats: &[String]) -> StoreResult<i32>;

    async fn list_bookings_for_user(&self, user_id: i32) -> StoreResult<Vec<Booking>>;
}
