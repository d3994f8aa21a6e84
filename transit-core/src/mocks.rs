//! In-memory repositories for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::models::{Booking, NewUser, Trip, User};
use crate::repository::{BookingRepository, StoreError, StoreResult, TripRepository, UserRepository};
use crate::search::TripSearch;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    trips: HashMap<i32, Trip>,
    bookings: Vec<Booking>,
    next_user_id: i32,
    next_trip_id: i32,
    next_booking_id: i32,
}

/// Single store implementing every repository trait, so one instance can back
/// a whole application state. Ids start at 1 per table like a serial column.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    fail_seat_updates: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::backend("in-memory store poisoned"))
    }

    /// Lock for the seeding and inspection helpers, which panic on a poisoned store.
    fn tables(&self) -> MutexGuard<'_, Tables> {
        match self.lock() {
            Ok(tables) => tables,
            Err(e) => panic!("{}", e),
        }
    }

    /// Seeds a trip, assigning the next id. Returns the stored trip.
    pub fn insert_trip(&self, mut trip: Trip) -> Trip {
        let mut tables = self.tables();
        tables.next_trip_id += 1;
        trip.id = tables.next_trip_id;
        tables.trips.insert(trip.id, trip.clone());
        trip
    }

    pub fn trip(&self, id: i32) -> Option<Trip> {
        self.tables().trips.get(&id).cloned()
    }

    pub fn bookings(&self) -> Vec<Booking> {
        self.tables().bookings.clone()
    }

    pub fn user_count(&self) -> usize {
        self.tables().users.len()
    }

    pub fn remove_user(&self, email: &str) {
        self.tables().users.retain(|u| u.email != email);
    }

    /// Makes every subsequent `update_trip_seats` call fail.
    pub fn fail_seat_updates(&self, fail: bool) {
        self.fail_seat_updates.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, user: &NewUser) -> StoreResult<i32> {
        let mut tables = self.lock()?;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation("users.email".to_string()));
        }

        tables.next_user_id += 1;
        let id = tables.next_user_id;
        tables.users.push(User {
            id,
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
        });
        Ok(id)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.lock()?;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl TripRepository for InMemoryStore {
    async fn get_trip(&self, id: i32) -> StoreResult<Option<Trip>> {
        Ok(self.lock()?.trips.get(&id).cloned())
    }

    async fn search_trips(&self, search: &TripSearch) -> StoreResult<Vec<Trip>> {
        let tables = self.lock()?;
        let mut trips: Vec<Trip> = tables
            .trips
            .values()
            .filter(|t| search.matches(t))
            .cloned()
            .collect();
        trips.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Ok(trips)
    }

    async fn update_trip_seats(
        &self,
        trip_id: i32,
        seats: &[String],
        seats_available: i32,
    ) -> StoreResult<()> {
        if self.fail_seat_updates.load(Ordering::SeqCst) {
            return Err(StoreError::backend("seat update rejected"));
        }

        let mut tables = self.lock()?;
        // Like an UPDATE matching zero rows, a missing trip is not an error.
        if let Some(trip) = tables.trips.get_mut(&trip_id) {
            trip.seats = seats.to_vec();
            trip.seats_available = seats_available;
        }
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn create_booking(&self, user_id: i32, trip_id: i32, seats: &[String]) -> StoreResult<i32> {
        let mut tables = self.lock()?;
        tables.next_booking_id += 1;
        let id = tables.next_booking_id;
        tables.bookings.push(Booking {
            id,
            user_id,
            trip_id,
            seats: seats.to_vec(),
        });
        Ok(id)
    }

    async fn list_bookings_for_user(&self, user_id: i32) -> StoreResult<Vec<Booking>> {
        let tables = self.lock()?;
        Ok(tables
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }
}
