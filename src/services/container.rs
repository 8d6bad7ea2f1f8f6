//! Service container - centralized service access.

use std::sync::Arc;

use super::{AuthService, BookingService, RoomService, UserService};
use crate::config::Config;
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get room service
    fn rooms(&self) -> Arc<dyn RoomService>;

    /// Get booking service
    fn bookings(&self) -> Arc<dyn BookingService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    room_service: Arc<dyn RoomService>,
    booking_service: Arc<dyn BookingService>,
}

impl Services {
    /// Create a new service container with all services initialized
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        room_service: Arc<dyn RoomService>,
        booking_service: Arc<dyn BookingService>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            room_service,
            booking_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        use super::{Authenticator, BookingManager, RoomManager, UserManager};

        let uow = Arc::new(Persistence::new(db));
        let auth_service = Arc::new(Authenticator::new(uow.clone(), config));
        let user_service = Arc::new(UserManager::new(uow.clone()));
        let room_service = Arc::new(RoomManager::new(uow.clone()));
        let booking_service = Arc::new(BookingManager::new(uow));

        Self {
            auth_service,
            user_service,
            room_service,
            booking_service,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn rooms(&self) -> Arc<dyn RoomService> {
        self.room_service.clone()
    }

    fn bookings(&self) -> Arc<dyn BookingService> {
        self.booking_service.clone()
    }
}
