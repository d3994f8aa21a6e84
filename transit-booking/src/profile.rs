use std::sync::Arc;

use transit_core::{BookingRepository, Claims, CoreError, CoreResult, Profile, UserRepository};

/// Read-only account view: the caller's user row plus every booking they own.
#[derive(Clone)]
pub struct ProfileService {
    users: Arc<dyn UserRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserRepository>, bookings: Arc<dyn BookingRepository>) -> Self {
        Self { users, bookings }
    }

    pub async fn profile(&self, claims: &Claims) -> CoreResult<Profile> {
        let user = self
            .users
            .find_user_by_email(claims.subject())
            .await?
            .ok_or_else(|| CoreError::NotFound("User not found".to_string()))?;

        let bookings = self.bookings.list_bookings_for_user(user.id).await?;

        Ok(Profile { user, bookings })
    }
}
