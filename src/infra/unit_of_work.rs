//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and transaction management. Cascading
//! lifecycle operations (archiving or blocking a user, archiving a room)
//! and the overlap-check-and-insert of a new booking each run inside one
//! transaction obtained here: either the whole cascade commits or none
//! of it does.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IsolationLevel, JoinType, PaginatorTrait, QueryFilter, QuerySelect, RelationTrait,
    TransactionTrait,
};
use sea_orm::sea_query::Expr;
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::entities::{booking, booking_room, room, user};
use super::repositories::{
    BookingRepository, BookingStore, RoomRepository, RoomStore, UserRepository, UserStore,
};
use crate::domain::{BookedRoom, Booking, BookingStatus, Room, RoomStatus, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction
/// management. The generic transaction methods are not mockable; the
/// services compose everything that runs inside a transaction against
/// [`TxStore`], which is.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get room repository
    fn rooms(&self) -> Arc<dyn RoomRepository>;

    /// Get booking repository
    fn bookings(&self) -> Arc<dyn BookingRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success or rolled back on error.
    /// Uses ReadCommitted isolation; sufficient for lifecycle cascades.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;

    /// Execute a closure within a serializable transaction.
    ///
    /// Required for the booking overlap check: two concurrent
    /// check-then-insert sequences must not both pass.
    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Operations available inside a transaction.
///
/// `TransactionContext` implements this over the transaction-bound
/// repositories. Cascades and booking admission are written against the
/// trait, so their step sequences can be driven by mocks while the SQL
/// stays in the repositories below.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TxStore: Send + Sync {
    /// Persist the mutable fields of a user
    async fn save_user(&self, user: &User) -> AppResult<User>;

    /// Persist the mutable fields of a room
    async fn save_room(&self, room: &Room) -> AppResult<Room>;

    /// Find every room whose id is in the set
    async fn find_rooms(&self, ids: Vec<Uuid>) -> AppResult<Vec<Room>>;

    /// Archive every non-archived room owned by the user
    async fn archive_owned_rooms(&self, owner_id: Uuid) -> AppResult<u64>;

    /// Move every owned room currently in `from` to `to`
    async fn transition_owned_rooms(
        &self,
        owner_id: Uuid,
        from: RoomStatus,
        to: RoomStatus,
    ) -> AppResult<u64>;

    /// Cancel every active booking made by the user
    async fn cancel_bookings_by_requester(&self, user_id: Uuid) -> AppResult<u64>;

    /// Cancel every active booking that references the room
    async fn cancel_bookings_by_room(&self, room_id: Uuid) -> AppResult<u64>;

    /// Check for an active booking sharing a room and intersecting [start, end)
    async fn has_active_overlap(
        &self,
        room_ids: Vec<Uuid>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<bool>;

    /// Insert a Pending booking with per-room price snapshots
    async fn insert_booking(
        &self,
        user_id: Uuid,
        rooms: Vec<Room>,
        start: NaiveDate,
        end: NaiveDate,
        total: Decimal,
    ) -> AppResult<Booking>;
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part
/// of the same database transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Get user repository for this transaction
    pub fn users(&self) -> TxUserRepository<'_> {
        TxUserRepository { txn: self.txn }
    }

    /// Get room repository for this transaction
    pub fn rooms(&self) -> TxRoomRepository<'_> {
        TxRoomRepository { txn: self.txn }
    }

    /// Get booking repository for this transaction
    pub fn bookings(&self) -> TxBookingRepository<'_> {
        TxBookingRepository { txn: self.txn }
    }
}

#[async_trait]
impl<'t> TxStore for TransactionContext<'t> {
    async fn save_user(&self, user: &User) -> AppResult<User> {
        self.users().save(user).await
    }

    async fn save_room(&self, room: &Room) -> AppResult<Room> {
        self.rooms().save(room).await
    }

    async fn find_rooms(&self, ids: Vec<Uuid>) -> AppResult<Vec<Room>> {
        self.rooms().find_many(&ids).await
    }

    async fn archive_owned_rooms(&self, owner_id: Uuid) -> AppResult<u64> {
        self.rooms().archive_owned(owner_id).await
    }

    async fn transition_owned_rooms(
        &self,
        owner_id: Uuid,
        from: RoomStatus,
        to: RoomStatus,
    ) -> AppResult<u64> {
        self.rooms().transition_owned(owner_id, from, to).await
    }

    async fn cancel_bookings_by_requester(&self, user_id: Uuid) -> AppResult<u64> {
        self.bookings().cancel_active_by_requester(user_id).await
    }

    async fn cancel_bookings_by_room(&self, room_id: Uuid) -> AppResult<u64> {
        self.bookings().cancel_active_by_room(room_id).await
    }

    async fn has_active_overlap(
        &self,
        room_ids: Vec<Uuid>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<bool> {
        self.bookings()
            .has_active_overlap(&room_ids, start, end)
            .await
    }

    async fn insert_booking(
        &self,
        user_id: Uuid,
        rooms: Vec<Room>,
        start: NaiveDate,
        end: NaiveDate,
        total: Decimal,
    ) -> AppResult<Booking> {
        self.bookings()
            .create(user_id, &rooms, start, end, total)
            .await
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    room_repo: Arc<RoomStore>,
    booking_repo: Arc<BookingStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        let room_repo = Arc::new(RoomStore::new(db.clone()));
        let booking_repo = Arc::new(BookingStore::new(db.clone()));
        Self {
            db,
            user_repo,
            room_repo,
            booking_repo,
        }
    }

    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn rooms(&self) -> Arc<dyn RoomRepository> {
        self.room_repo.clone()
    }

    fn bookings(&self) -> Arc<dyn BookingRepository> {
        self.booking_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, f)
            .await
    }

    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::Serializable, f)
            .await
    }
}

fn active_booking_statuses() -> Vec<String> {
    BookingStatus::ACTIVE.iter().map(|s| s.to_string()).collect()
}

/// Transaction-aware user repository.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    /// Persist the mutable fields of a user
    pub async fn save(&self, u: &User) -> AppResult<User> {
        let active = user::ActiveModel {
            id: sea_orm::ActiveValue::Unchanged(u.id),
            email: Set(u.email.clone()),
            password_hash: Set(u.password_hash.clone()),
            name: Set(u.name.clone()),
            role: Set(u.role.to_string()),
            status: Set(u.status.to_string()),
            telegram_id: Set(u.telegram_id),
            telegram_username: Set(u.telegram_username.clone()),
            created_at: sea_orm::ActiveValue::Unchanged(u.created_at),
            updated_at: Set(u.updated_at),
        };

        let model = active.update(self.txn).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }
}

/// Transaction-aware room repository.
pub struct TxRoomRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxRoomRepository<'a> {
    /// Find every room whose id is in the set
    pub async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Room>> {
        let models = room::Entity::find()
            .filter(room::Column::Id.is_in(ids.to_vec()))
            .all(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Room::from).collect())
    }

    /// Persist the mutable fields of a room
    pub async fn save(&self, r: &Room) -> AppResult<Room> {
        let model = super::repositories::room_active_model(r)
            .update(self.txn)
            .await
            .map_err(AppError::from)?;
        Ok(Room::from(model))
    }

    /// Archive every non-archived room owned by the user.
    pub async fn archive_owned(&self, owner_id: Uuid) -> AppResult<u64> {
        let result = room::Entity::update_many()
            .col_expr(
                room::Column::Status,
                Expr::value(RoomStatus::Archived.to_string()),
            )
            .col_expr(room::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(room::Column::OwnerId.eq(owner_id))
            .filter(room::Column::Status.ne(RoomStatus::Archived.to_string()))
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }

    /// Move every owned room currently in `from` to `to`.
    ///
    /// Used by the block/unblock cascades: blocking touches only
    /// Available rooms, unblocking only Blocked rooms, so rooms parked
    /// in Maintenance or Archived are left alone.
    pub async fn transition_owned(
        &self,
        owner_id: Uuid,
        from: RoomStatus,
        to: RoomStatus,
    ) -> AppResult<u64> {
        let result = room::Entity::update_many()
            .col_expr(room::Column::Status, Expr::value(to.to_string()))
            .col_expr(room::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(room::Column::OwnerId.eq(owner_id))
            .filter(room::Column::Status.eq(from.to_string()))
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }
}

/// Transaction-aware booking repository.
pub struct TxBookingRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxBookingRepository<'a> {
    /// Check whether any Pending/Confirmed booking shares a room with the
    /// request and intersects [start, end) under half-open semantics.
    pub async fn has_active_overlap(
        &self,
        room_ids: &[Uuid],
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<bool> {
        let overlapping = booking::Entity::find()
            .join(JoinType::InnerJoin, booking::Relation::BookingRooms.def())
            .filter(booking_room::Column::RoomId.is_in(room_ids.to_vec()))
            .filter(booking::Column::Status.is_in(active_booking_statuses()))
            .filter(booking::Column::StartDate.lt(end))
            .filter(booking::Column::EndDate.gt(start))
            .count(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(overlapping > 0)
    }

    /// Insert a Pending booking with one join record per room, each
    /// snapshotting the room's current price.
    pub async fn create(
        &self,
        user_id: Uuid,
        rooms: &[Room],
        start: NaiveDate,
        end: NaiveDate,
        total_price: Decimal,
    ) -> AppResult<Booking> {
        let now = chrono::Utc::now();
        let booking_id = Uuid::new_v4();

        let active = booking::ActiveModel {
            id: Set(booking_id),
            user_id: Set(user_id),
            status: Set(BookingStatus::Pending.to_string()),
            created_at: Set(now),
            start_date: Set(start),
            end_date: Set(end),
            total_price: Set(total_price),
        };
        let model = active.insert(self.txn).await.map_err(AppError::from)?;

        let joins: Vec<booking_room::ActiveModel> = rooms
            .iter()
            .map(|r| booking_room::ActiveModel {
                booking_id: Set(booking_id),
                room_id: Set(r.id),
                price_at_booking: Set(r.price_per_day),
            })
            .collect();
        booking_room::Entity::insert_many(joins)
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(Booking {
            id: model.id,
            user_id: model.user_id,
            status: BookingStatus::Pending,
            created_at: model.created_at,
            start_date: model.start_date,
            end_date: model.end_date,
            total_price: model.total_price,
            rooms: rooms
                .iter()
                .map(|r| BookedRoom {
                    room_id: r.id,
                    room_name: r.name.clone(),
                    price_at_booking: r.price_per_day,
                })
                .collect(),
        })
    }

    /// Cancel every Pending/Confirmed booking made by the user.
    pub async fn cancel_active_by_requester(&self, user_id: Uuid) -> AppResult<u64> {
        let result = booking::Entity::update_many()
            .col_expr(
                booking::Column::Status,
                Expr::value(BookingStatus::Cancelled.to_string()),
            )
            .filter(booking::Column::UserId.eq(user_id))
            .filter(booking::Column::Status.is_in(active_booking_statuses()))
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }

    /// Cancel every Pending/Confirmed booking that references the room.
    pub async fn cancel_active_by_room(&self, room_id: Uuid) -> AppResult<u64> {
        let ids: Vec<Uuid> = booking::Entity::find()
            .select_only()
            .column(booking::Column::Id)
            .join(JoinType::InnerJoin, booking::Relation::BookingRooms.def())
            .filter(booking_room::Column::RoomId.eq(room_id))
            .filter(booking::Column::Status.is_in(active_booking_statuses()))
            .into_tuple()
            .all(self.txn)
            .await
            .map_err(AppError::from)?;

        if ids.is_empty() {
            return Ok(0);
        }

        let result = booking::Entity::update_many()
            .col_expr(
                booking::Column::Status,
                Expr::value(BookingStatus::Cancelled.to_string()),
            )
            .filter(booking::Column::Id.is_in(ids))
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }
}
