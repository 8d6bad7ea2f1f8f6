//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::infra::Database;
use crate::services::{
    AuthService, BookingService, RoomService, ServiceContainer, Services, UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Room service
    pub room_service: Arc<dyn RoomService>,
    /// Booking service
    pub booking_service: Arc<dyn BookingService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, config: crate::config::Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);

        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            room_service: container.rooms(),
            booking_service: container.bookings(),
            database,
        }
    }

    /// Create new application state with manually injected services.
    ///
    /// Intended for tests that substitute service mocks.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        room_service: Arc<dyn RoomService>,
        booking_service: Arc<dyn BookingService>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            room_service,
            booking_service,
            database,
        }
    }
}
