pub mod profile;
pub mod seats;
pub mod service;

pub use profile::ProfileService;
pub use seats::{allocate, SeatAllocation};
pub use service::BookingService;
