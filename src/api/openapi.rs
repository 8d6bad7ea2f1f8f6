//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, booking_handler, room_handler, user_handler};
use crate::domain::{
    BookedRoom, BookingResponse, BookingStatus, RoomResponse, RoomStatus, UserResponse, UserRole,
    UserStatus,
};
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// OpenAPI documentation for the room reservation API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Roomstay API",
        version = "0.1.0",
        description = "Room reservation backend with owner inventory and admin moderation",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::telegram_login,
        // User endpoints
        user_handler::get_current_user,
        user_handler::list_users,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::archive_user,
        user_handler::block_user,
        user_handler::unblock_user,
        // Room endpoints
        room_handler::create_room,
        room_handler::list_available,
        room_handler::get_room,
        room_handler::update_room,
        room_handler::archive_room,
        // Booking endpoints
        booking_handler::create_booking,
        booking_handler::list_bookings,
        booking_handler::get_booking,
        booking_handler::cancel_booking,
        booking_handler::confirm_booking,
    ),
    components(
        schemas(
            // Domain enums
            UserRole,
            UserStatus,
            RoomStatus,
            BookingStatus,
            // Domain responses
            UserResponse,
            RoomResponse,
            BookingResponse,
            BookedRoom,
            MessageResponse,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::AuthResponse,
            TokenResponse,
            // Request types
            user_handler::UpdateUserRequest,
            room_handler::CreateRoomRequest,
            room_handler::UpdateRoomRequest,
            booking_handler::CreateBookingRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Users", description = "Profiles and account moderation"),
        (name = "Rooms", description = "Room inventory"),
        (name = "Bookings", description = "Reservations")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
