//! Room service - inventory management and moderation.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{policy, Caller, NewRoom, Room, RoomStatus};
use crate::errors::{AppError, AppResult};
use crate::infra::{TxStore, UnitOfWork};

/// Room update input. `status` follows the actor's privileges; owner_id
/// reassignment is admin-only.
#[derive(Debug, Default)]
pub struct UpdateRoomInput {
    pub name: Option<String>,
    pub price_per_day: Option<Decimal>,
    pub status: Option<RoomStatus>,
    pub owner_id: Option<Uuid>,
}

/// Room service trait for dependency injection.
#[async_trait]
pub trait RoomService: Send + Sync {
    /// Create a room owned by the caller
    async fn create_room(
        &self,
        actor: &Caller,
        name: String,
        price_per_day: Decimal,
    ) -> AppResult<Room>;

    /// Get a room by ID; archived rooms are visible to admins only
    async fn get_room(&self, actor: &Caller, id: Uuid) -> AppResult<Room>;

    /// List rooms open for booking
    async fn list_available(&self) -> AppResult<Vec<Room>>;

    /// Update room fields; owner or admin
    async fn update_room(
        &self,
        actor: &Caller,
        room_id: Uuid,
        input: UpdateRoomInput,
    ) -> AppResult<Room>;

    /// Archive a room and cancel active bookings referencing it (admin)
    async fn archive_room(&self, actor: &Caller, room_id: Uuid) -> AppResult<Room>;
}

/// Room archive cascade: persist the archived room and cancel every
/// active booking still referencing it.
pub(crate) async fn apply_room_archive_cascade(
    store: &dyn TxStore,
    room: &Room,
) -> AppResult<Room> {
    let saved = store.save_room(room).await?;
    let cancelled = store.cancel_bookings_by_room(saved.id).await?;
    tracing::info!(
        room_id = %saved.id,
        bookings_cancelled = cancelled,
        "room archived"
    );
    Ok(saved)
}

/// Concrete implementation of RoomService using Unit of Work.
pub struct RoomManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> RoomManager<U> {
    /// Create new room service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn find_required(&self, id: Uuid) -> AppResult<Room> {
        self.uow
            .rooms()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Room"))
    }
}

#[async_trait]
impl<U: UnitOfWork> RoomService for RoomManager<U> {
    async fn create_room(
        &self,
        actor: &Caller,
        name: String,
        price_per_day: Decimal,
    ) -> AppResult<Room> {
        let owner = self
            .uow
            .users()
            .find_by_id(actor.id)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        if !owner.is_active() {
            return Err(AppError::OwnerNotActive);
        }

        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(AppError::EmptyName);
        }

        if price_per_day.is_sign_negative() {
            return Err(AppError::NegativePrice);
        }

        self.uow
            .rooms()
            .create(NewRoom {
                owner_id: owner.id,
                name: trimmed.to_string(),
                price_per_day,
            })
            .await
    }

    async fn get_room(&self, actor: &Caller, id: Uuid) -> AppResult<Room> {
        let room = self.find_required(id).await?;

        if room.status == RoomStatus::Archived && !actor.is_admin() {
            return Err(AppError::NotFound("Room"));
        }

        Ok(room)
    }

    async fn list_available(&self) -> AppResult<Vec<Room>> {
        self.uow.rooms().list_available().await
    }

    async fn update_room(
        &self,
        actor: &Caller,
        room_id: Uuid,
        input: UpdateRoomInput,
    ) -> AppResult<Room> {
        let mut room = self.find_required(room_id).await?;

        policy::require_admin_or_owner(actor, room.owner_id)?;

        if !actor.is_active() {
            return Err(AppError::ActorNotActive);
        }

        // An archived room is frozen unless an admin is explicitly
        // pulling it back out of Archived in this same update.
        let restoring = actor.is_admin()
            && matches!(input.status, Some(s) if s != RoomStatus::Archived);
        if room.status == RoomStatus::Archived && !restoring {
            return Err(AppError::ArchivedImmutable);
        }

        if let Some(status) = input.status {
            room.set_status(status, actor.is_admin())?;
        }

        if let Some(name) = input.name {
            room.rename(&name)?;
        }

        if let Some(price) = input.price_per_day {
            room.set_price(price)?;
        }

        if let Some(new_owner) = input.owner_id {
            policy::require_admin(actor)?;
            self.uow
                .users()
                .find_by_id(new_owner)
                .await?
                .ok_or(AppError::NotFound("User"))?;
            room.owner_id = new_owner;
        }

        room.updated_at = chrono::Utc::now();
        self.uow.rooms().save(&room).await
    }

    async fn archive_room(&self, actor: &Caller, room_id: Uuid) -> AppResult<Room> {
        policy::require_admin(actor)?;

        let mut room = self.find_required(room_id).await?;
        room.archive()?;
        room.updated_at = chrono::Utc::now();

        self.uow
            .transaction(move |ctx| {
                Box::pin(async move { apply_room_archive_cascade(&ctx, &room).await })
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockTxStore;
    use chrono::Utc;

    #[tokio::test]
    async fn room_archive_cascade_cancels_referencing_bookings() {
        let room = Room {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "Seaside".to_string(),
            price_per_day: Decimal::from(100),
            status: RoomStatus::Archived,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let room_id = room.id;

        let mut store = MockTxStore::new();
        store
            .expect_save_room()
            .times(1)
            .returning(|r| Ok(r.clone()));
        store
            .expect_cancel_bookings_by_room()
            .withf(move |id| *id == room_id)
            .times(1)
            .returning(|_| Ok(2));

        let saved = apply_room_archive_cascade(&store, &room).await.unwrap();
        assert_eq!(saved.status, RoomStatus::Archived);
    }
}
