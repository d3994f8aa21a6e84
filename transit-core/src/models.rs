use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i32,
    pub rating: i32,
    pub comment: String,
    pub reviewer: String,
}

/// A scheduled trip together with its remaining seat inventory.
///
/// `seats` holds the labels still available, in seat-map order, and
/// `seats_available` mirrors its length. Only the seat allocator changes
/// either field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: i32,
    pub from: String,
    pub to: String,
    pub date: NaiveDate,
    pub departure_time: String,
    pub arrival_time: String,
    pub price: f64,
    pub seats_available: i32,
    #[serde(default)]
    pub bus_operator: String,
    #[serde(default)]
    pub duration: String,
    pub seats: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub intermediate_stops: Vec<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
}

/// User row ready to be inserted; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i32,
    #[serde(rename = "userId")]
    pub user_id: i32,
    pub trip_id: i32,
    pub seats: Vec<String>,
}

/// Decoded body of a booking request. The owner is never taken from the body.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub trip_id: i32,
    #[serde(default)]
    pub seats: Vec<String>,
}

/// Account view returned by the profile endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    #[serde(flatten)]
    pub user: User,
    pub bookings: Vec<Booking>,
}
