//! Domain layer - Core business entities and logic
//!
//! Entities, value objects, the three lifecycle state machines, and the
//! availability rules, independent of infrastructure concerns.

pub mod booking;
pub mod password;
pub mod policy;
pub mod room;
pub mod user;

pub use booking::{
    ranges_overlap, stay_days, total_price, validate_range, validate_rooms, BookedRoom, Booking,
    BookingResponse, BookingStatus,
};
pub use password::Password;
pub use policy::Caller;
pub use room::{NewRoom, Room, RoomResponse, RoomStatus};
pub use user::{NewUser, User, UserResponse, UserRole, UserStatus};
