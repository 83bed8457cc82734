pub mod assets;
pub mod bookings;
pub mod catalog;
