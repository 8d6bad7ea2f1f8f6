//! Room repository implementation.

use async_trait::async_trait;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use super::entities::room::{self, ActiveModel, Entity as RoomEntity};
use crate::domain::{NewRoom, Room, RoomStatus};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Room repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Find room by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Room>>;

    /// Find every room whose id is in the set
    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Room>>;

    /// Create a new room with status Available
    async fn create(&self, new_room: NewRoom) -> AppResult<Room>;

    /// Persist the mutable fields of a room
    async fn save(&self, room: &Room) -> AppResult<Room>;

    /// List rooms open for booking (status Available)
    async fn list_available(&self) -> AppResult<Vec<Room>>;
}

/// Concrete implementation of RoomRepository
pub struct RoomStore {
    db: DatabaseConnection,
}

impl RoomStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Build the write model for an existing room
pub(crate) fn to_active_model(room: &Room) -> ActiveModel {
    ActiveModel {
        id: Unchanged(room.id),
        owner_id: Set(room.owner_id),
        name: Set(room.name.clone()),
        price_per_day: Set(room.price_per_day),
        status: Set(room.status.to_string()),
        created_at: Unchanged(room.created_at),
        updated_at: Set(room.updated_at),
    }
}

#[async_trait]
impl RoomRepository for RoomStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Room>> {
        let result = RoomEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Room::from))
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Room>> {
        let models = RoomEntity::find()
            .filter(room::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Room::from).collect())
    }

    async fn create(&self, new_room: NewRoom) -> AppResult<Room> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(new_room.owner_id),
            name: Set(new_room.name),
            price_per_day: Set(new_room.price_per_day),
            status: Set(RoomStatus::Available.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Room::from(model))
    }

    async fn save(&self, room: &Room) -> AppResult<Room> {
        let model = to_active_model(room)
            .update(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(Room::from(model))
    }

    async fn list_available(&self) -> AppResult<Vec<Room>> {
        let models = RoomEntity::find()
            .filter(room::Column::Status.eq(RoomStatus::Available.to_string()))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Room::from).collect())
    }
}
