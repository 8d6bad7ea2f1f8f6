//! API layer - HTTP surface

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
