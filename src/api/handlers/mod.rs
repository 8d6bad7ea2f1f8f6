//! HTTP handlers

pub mod auth_handler;
pub mod booking_handler;
pub mod room_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use booking_handler::booking_routes;
pub use room_handler::room_routes;
pub use user_handler::user_routes;
