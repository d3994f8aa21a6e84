use std::sync::Arc;

use chrono::Duration;
use transit_booking::{BookingService, ProfileService};
use transit_core::{BookingRepository, TripRepository, UserRepository};

use crate::middleware::{CredentialVerifier, TokenIssuer};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    /// Token lifetime in seconds.
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub trips: Arc<dyn TripRepository>,
    pub booking_service: BookingService,
    pub profile_service: ProfileService,
    pub tokens: TokenIssuer,
    pub verifier: CredentialVerifier,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        trips: Arc<dyn TripRepository>,
        bookings: Arc<dyn BookingRepository>,
        auth: &AuthConfig,
    ) -> Self {
        let secs = i64::try_from(auth.expiration).unwrap_or(i64::MAX).min(i64::MAX / 1000);
        let ttl = Duration::seconds(secs);

        Self {
            booking_service: BookingService::new(users.clone(), trips.clone(), bookings.clone()),
            profile_service: ProfileService::new(users.clone(), bookings),
            tokens: TokenIssuer::new(auth.secret.as_bytes(), ttl),
            verifier: CredentialVerifier::new(auth.secret.as_bytes()),
            users,
            trips,
        }
    }
}
