use std::sync::Arc;

use tracing::{debug, error, info};
use transit_core::{
    Booking, BookingRepository, BookingRequest, Claims, CoreError, CoreResult, TripRepository,
    UserRepository,
};
use transit_shared::pii::mask_email;

use crate::seats::allocate;

/// Creates bookings and takes the booked seats out of the trip inventory.
///
/// The steps run in a fixed order against the store with no surrounding
/// transaction: the booking row is written first, then the trip is read, then
/// the new inventory is written back. A failure after the first write leaves
/// the booking row in place, and two overlapping requests for the same trip
/// can both read the same inventory and both succeed.
#[derive(Clone)]
pub struct BookingService {
    users: Arc<dyn UserRepository>,
    trips: Arc<dyn TripRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl BookingService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        trips: Arc<dyn TripRepository>,
        bookings: Arc<dyn BookingRepository>,
    ) -> Self {
        Self {
            users,
            trips,
            bookings,
        }
    }

    pub async fn create_booking(&self, claims: &Claims, req: BookingRequest) -> CoreResult<Booking> {
        // 1. Resolve owner
        let user = self
            .users
            .find_user_by_email(claims.subject())
            .await
            .map_err(|e| CoreError::Internal(format!("User lookup failed: {}", e)))?
            .ok_or_else(|| CoreError::NotFound("User not found".to_string()))?;

        // 2. Record booking
        let booking_id = self
            .bookings
            .create_booking(user.id, req.trip_id, &req.seats)
            .await
            .map_err(|e| {
                error!("Failed to create booking: {}", e);
                CoreError::Internal(format!("Failed to create booking: {}", e))
            })?;

        let booking = Booking {
            id: booking_id,
            user_id: user.id,
            trip_id: req.trip_id,
            seats: req.seats,
        };

        // 3. Load inventory
        let trip = self
            .trips
            .get_trip(booking.trip_id)
            .await
            .map_err(|e| CoreError::Internal(format!("Trip lookup failed: {}", e)))?
            .ok_or_else(|| {
                error!(
                    booking_id = booking.id,
                    trip_id = booking.trip_id,
                    "Booking recorded for unknown trip"
                );
                CoreError::Internal("Trip not found for seat update".to_string())
            })?;

        // 4. Allocate
        let allocation = allocate(&trip.seats, trip.seats_available, &booking.seats);
        if !allocation.ignored.is_empty() {
            debug!(
                trip_id = trip.id,
                ignored = ?allocation.ignored,
                "Requested seats not in inventory"
            );
        }

        // 5. Persist inventory
        self.trips
            .update_trip_seats(trip.id, &allocation.seats, allocation.seats_available)
            .await
            .map_err(|e| {
                error!(booking_id = booking.id, "Failed to update trip seats: {}", e);
                CoreError::Internal(format!("Failed to update trip seats: {}", e))
            })?;

        info!(
            booking_id = booking.id,
            trip_id = trip.id,
            user = %mask_email(&user.email),
            seats = allocation.removed.len(),
            remaining = allocation.seats_available,
            "Booking confirmed"
        );

        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use transit_core::mocks::InMemoryStore;
    use async_trait::async_trait;
    use tokio::sync::Barrier;
    use transit_core::{NewUser, StoreResult, Trip, TripSearch};

    fn trip(seats: &[&str]) -> Trip {
        Trip {
            id: 0,
            from: "Addis Ababa".to_string(),
            to: "Adama".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 8, 20).unwrap(),
            departure_time: "08:00".to_string(),
            arrival_time: "09:30".to_string(),
            price: 350.0,
            seats_available: seats.len() as i32,
            bus_operator: "Selam Bus".to_string(),
            duration: "1h 30m".to_string(),
            seats: seats.iter().map(|s| s.to_string()).collect(),
            amenities: vec![],
            intermediate_stops: vec![],
            reviews: vec![],
        }
    }

    async fn setup() -> (Arc<InMemoryStore>, BookingService, Claims) {
        let store = Arc::new(InMemoryStore::new());
        store
            .create_user(&NewUser {
                name: "Abebe".to_string(),
                email: "abebe@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();

        let service = BookingService::new(store.clone(), store.clone(), store.clone());
        let claims = Claims::new("abebe@example.com", 0, 300);
        (store, service, claims)
    }

    fn request(trip_id: i32, seats: &[&str]) -> BookingRequest {
        BookingRequest {
            trip_id,
            seats: seats.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_booking_removes_seats() {
        let (store, service, claims) = setup().await;
        let trip = store.insert_trip(trip(&["A1", "A2", "A3"]));

        let booking = service
            .create_booking(&claims, request(trip.id, &["A1", "A2"]))
            .await
            .unwrap();

        assert_eq!(booking.id, 1);
        assert_eq!(booking.user_id, 1);
        assert_eq!(booking.seats, vec!["A1".to_string(), "A2".to_string()]);

        let updated = store.trip(trip.id).unwrap();
        assert_eq!(updated.seats, vec!["A3".to_string()]);
        assert_eq!(updated.seats_available, 1);
        assert_eq!(store.bookings().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_seat_labels_do_not_fail() {
        let (store, service, claims) = setup().await;
        let trip = store.insert_trip(trip(&["A1", "A2"]));

        let booking = service
            .create_booking(&claims, request(trip.id, &["A2", "Q7"]))
            .await
            .unwrap();

        // The stored booking keeps the seats as requested.
        assert_eq!(booking.seats, vec!["A2".to_string(), "Q7".to_string()]);
        let updated = store.trip(trip.id).unwrap();
        assert_eq!(updated.seats, vec!["A1".to_string()]);
        assert_eq!(updated.seats_available, 1);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let (store, service, _) = setup().await;
        let trip = store.insert_trip(trip(&["A1"]));
        let claims = Claims::new("ghost@example.com", 0, 300);

        let err = service
            .create_booking(&claims, request(trip.id, &["A1"]))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::NotFound(_)));
        assert!(store.bookings().is_empty());
        assert_eq!(store.trip(trip.id).unwrap().seats_available, 1);
    }

    #[tokio::test]
    async fn test_missing_trip_keeps_booking_row() {
        let (store, service, claims) = setup().await;

        let err = service
            .create_booking(&claims, request(99, &["A1"]))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Internal(_)));
        let bookings = store.bookings();
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].trip_id, 99);
    }

    #[tokio::test]
    async fn test_failed_seat_update_is_not_rolled_back() {
        let (store, service, claims) = setup().await;
        let trip = store.insert_trip(trip(&["A1", "A2"]));
        store.fail_seat_updates(true);

        let err = service
            .create_booking(&claims, request(trip.id, &["A1"]))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Internal(_)));
        assert_eq!(store.bookings().len(), 1);
        assert_eq!(store.trip(trip.id).unwrap().seats.len(), 2);
    }

    #[tokio::test]
    async fn test_rebooking_taken_seat_succeeds_as_no_op() {
        let (store, service, claims) = setup().await;
        let trip = store.insert_trip(trip(&["A1", "A2"]));

        service
            .create_booking(&claims, request(trip.id, &["A1"]))
            .await
            .unwrap();
        service
            .create_booking(&claims, request(trip.id, &["A1"]))
            .await
            .unwrap();

        let updated = store.trip(trip.id).unwrap();
        assert_eq!(updated.seats, vec!["A2".to_string()]);
        assert_eq!(updated.seats_available, 1);
        assert_eq!(store.bookings().len(), 2);
    }

    /// Holds every `get_trip` caller until all of them have read the trip,
    /// so each one sees the inventory as it was before any update.
    struct SnapshotTrips {
        store: Arc<InMemoryStore>,
        readers: Barrier,
    }

    #[async_trait]
    impl TripRepository for SnapshotTrips {
        async fn get_trip(&self, id: i32) -> StoreResult<Option<Trip>> {
            let trip = self.store.get_trip(id).await?;
            self.readers.wait().await;
            Ok(trip)
        }

        async fn search_trips(&self, search: &TripSearch) -> StoreResult<Vec<Trip>> {
            self.store.search_trips(search).await
        }

        async fn update_trip_seats(
            &self,
            trip_id: i32,
            seats: &[String],
            seats_available: i32,
        ) -> StoreResult<()> {
            self.store.update_trip_seats(trip_id, seats, seats_available).await
        }
    }

    #[tokio::test]
    async fn test_overlapping_bookings_both_succeed() {
        let (store, _, claims) = setup().await;
        let trip = store.insert_trip(trip(&["A1", "A2"]));
        let trips = Arc::new(SnapshotTrips {
            store: store.clone(),
            readers: Barrier::new(2),
        });
        let service = BookingService::new(store.clone(), trips, store.clone());

        let (first, second) = tokio::join!(
            service.create_booking(&claims, request(trip.id, &["A1"])),
            service.create_booking(&claims, request(trip.id, &["A1"])),
        );
        assert!(first.is_ok());
        assert!(second.is_ok());

        let bookings = store.bookings();
        assert_eq!(bookings.len(), 2);
        assert!(bookings.iter().all(|b| b.seats == vec!["A1".to_string()]));

        let updated = store.trip(trip.id).unwrap();
        assert_eq!(updated.seats, vec!["A2".to_string()]);
        assert_eq!(updated.seats_available, 1);
    }
}
