//! Infrastructure layer - Database, repositories, and transactions

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::Database;
pub use repositories::{
    BookingRepository, BookingStore, RoomRepository, RoomStore, UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, TransactionContext, TxStore, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockBookingRepository, MockRoomRepository, MockUserRepository};
#[cfg(any(test, feature = "test-utils"))]
pub use unit_of_work::MockTxStore;
