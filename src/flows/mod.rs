//! # Flows
//!
//! One function per API operation. Each takes a fresh operation bridge,
//! drives the store through the orchestrator and returns either an assembled
//! response or a fixed client error.

mod airports;
mod bookings;
mod flight_paths;
mod hotels;
mod users;

pub use airports::search_airports;
pub use bookings::{book_flights, list_bookings, BookingRequest};
pub use flight_paths::find_flight_paths;
pub use hotels::search_hotels;
pub use users::{login, signup, Credentials};
