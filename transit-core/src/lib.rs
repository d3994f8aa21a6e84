pub mod identity;
pub mod mocks;
pub mod models;
pub mod repository;
pub mod search;

pub use identity::Claims;
pub use models::{Booking, BookingRequest, NewUser, Profile, Review, Trip, User};
pub use repository::{BookingRepository, StoreError, StoreResult, TripRepository, UserRepository};
pub use search::TripSearch;

/// Failure taxonomy shared by every request path.
///
/// Each variant maps to exactly one HTTP status in the API crate. No variant is
/// retried anywhere; a failure is terminal for the request that produced it.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal service error: {0}")]
    Internal(String),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(key) => CoreError::Conflict(key),
            StoreError::Backend(e) => CoreError::Internal(e.to_string()),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
