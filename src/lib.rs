//! Roomstay - a room reservation backend.
//!
//! Users own rooms, other users reserve them for date ranges, and
//! administrators moderate the lifecycle of users, rooms, and bookings.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and the reservation rules
//! - **services**: Application use cases over the Unit of Work
//! - **infra**: Database, repositories, migrations, transactions
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Booking, Caller, Password, Room, User, UserRole};
pub use errors::{AppError, AppResult};
