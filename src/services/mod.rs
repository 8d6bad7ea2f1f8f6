//! Service layer - Business logic over the Unit of Work

mod auth_service;
mod booking_service;
mod container;
mod room_service;
mod user_service;

pub use auth_service::{AuthService, Authenticator, Claims, RegisterInput, TokenResponse};
pub use booking_service::{BookingManager, BookingService};
pub use container::{ServiceContainer, Services};
pub use room_service::{RoomManager, RoomService, UpdateRoomInput};
pub use user_service::{UpdateUserInput, UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
