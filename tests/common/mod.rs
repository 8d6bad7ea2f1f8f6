//! Shared test fixtures: repository mocks and a transaction-less
//! Unit of Work.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use mockall::mock;
use rust_decimal::Decimal;
use uuid::Uuid;

use roomstay::domain::{
    Booking, BookingStatus, Caller, NewRoom, NewUser, Room, RoomStatus, User, UserRole, UserStatus,
};
use roomstay::errors::{AppError, AppResult};
use roomstay::infra::{
    BookingRepository, RoomRepository, TransactionContext, UnitOfWork, UserRepository,
};

mock! {
    pub UserRepo {}

    #[async_trait]
    impl UserRepository for UserRepo {
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
        async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
        async fn find_by_telegram_id(&self, telegram_id: i64) -> AppResult<Option<User>>;
        async fn create(&self, new_user: NewUser) -> AppResult<User>;
        async fn save(&self, user: &User) -> AppResult<User>;
        async fn list_active(&self) -> AppResult<Vec<User>>;
    }
}

mock! {
    pub RoomRepo {}

    #[async_trait]
    impl RoomRepository for RoomRepo {
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Room>>;
        async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Room>>;
        async fn create(&self, new_room: NewRoom) -> AppResult<Room>;
        async fn save(&self, room: &Room) -> AppResult<Room>;
        async fn list_available(&self) -> AppResult<Vec<Room>>;
    }
}

mock! {
    pub BookingRepo {}

    #[async_trait]
    impl BookingRepository for BookingRepo {
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>>;
        async fn list_all(&self) -> AppResult<Vec<Booking>>;
        async fn list_by_requester(&self, user_id: Uuid) -> AppResult<Vec<Booking>>;
        async fn set_status(&self, id: Uuid, status: BookingStatus) -> AppResult<()>;
    }
}

/// Unit of Work over the repository mocks. Transactions are not
/// available here; cascade and admission step sequences are covered by
/// the service unit tests through the transaction store mock.
pub struct TestUnitOfWork {
    pub users: Arc<MockUserRepo>,
    pub rooms: Arc<MockRoomRepo>,
    pub bookings: Arc<MockBookingRepo>,
}

impl TestUnitOfWork {
    pub fn new(users: MockUserRepo, rooms: MockRoomRepo, bookings: MockBookingRepo) -> Self {
        Self {
            users: Arc::new(users),
            rooms: Arc::new(rooms),
            bookings: Arc::new(bookings),
        }
    }

    pub fn with_users(users: MockUserRepo) -> Self {
        Self::new(users, MockRoomRepo::new(), MockBookingRepo::new())
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn rooms(&self) -> Arc<dyn RoomRepository> {
        self.rooms.clone()
    }

    fn bookings(&self) -> Arc<dyn BookingRepository> {
        self.bookings.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        // Transaction not supported in test mock
        Err(AppError::internal("Transactions not supported in test mock"))
    }

    async fn transaction_serializable<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        // Transaction not supported in test mock
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}

pub fn test_user(id: Uuid, role: UserRole, status: UserStatus) -> User {
    User {
        id,
        email: "test@example.com".to_string(),
        password_hash: "hashed".to_string(),
        name: "Test User".to_string(),
        role,
        status,
        telegram_id: None,
        telegram_username: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_room(id: Uuid, owner_id: Uuid, status: RoomStatus) -> Room {
    Room {
        id,
        owner_id,
        name: "Garden room".to_string(),
        price_per_day: Decimal::from(100),
        status,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_booking(id: Uuid, user_id: Uuid, status: BookingStatus) -> Booking {
    Booking {
        id,
        user_id,
        status,
        created_at: Utc::now(),
        start_date: date(2024, 6, 1),
        end_date: date(2024, 6, 4),
        total_price: Decimal::from(300),
        rooms: vec![],
    }
}

pub fn admin_caller() -> Caller {
    Caller {
        id: Uuid::new_v4(),
        role: UserRole::Admin,
        status: UserStatus::Active,
    }
}

pub fn user_caller(id: Uuid) -> Caller {
    Caller {
        id,
        role: UserRole::User,
        status: UserStatus::Active,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
