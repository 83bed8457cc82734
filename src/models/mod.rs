pub mod booking;
pub mod flash;
pub mod service;

pub use booking::{Booking, BookingStatus, NewBooking};
pub use flash::{Flash, FlashKind};
pub use service::{sanitize_input, Service, ServiceInput};
