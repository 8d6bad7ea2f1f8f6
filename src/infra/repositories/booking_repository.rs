//! Booking repository implementation.
//!
//! Bookings are always read together with their room snapshots; the room
//! name comes from the rooms table as of the read, the price from the
//! join record as of creation.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use super::entities::{booking, booking_room, room};
use crate::domain::{BookedRoom, Booking, BookingStatus};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Booking repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Find booking by ID, room snapshots included
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>>;

    /// List all bookings (admin view)
    async fn list_all(&self) -> AppResult<Vec<Booking>>;

    /// List bookings made by the given requester
    async fn list_by_requester(&self, user_id: Uuid) -> AppResult<Vec<Booking>>;

    /// Persist a status transition
    async fn set_status(&self, id: Uuid, status: BookingStatus) -> AppResult<()>;
}

/// Assemble domain bookings from booking rows and their join records,
/// resolving current room names in one query.
pub(crate) async fn hydrate<C: ConnectionTrait>(
    conn: &C,
    rows: Vec<(booking::Model, Vec<booking_room::Model>)>,
) -> AppResult<Vec<Booking>> {
    let room_ids: Vec<Uuid> = rows
        .iter()
        .flat_map(|(_, joins)| joins.iter().map(|j| j.room_id))
        .collect();

    let names: HashMap<Uuid, String> = if room_ids.is_empty() {
        HashMap::new()
    } else {
        room::Entity::find()
            .filter(room::Column::Id.is_in(room_ids))
            .all(conn)
            .await
            .map_err(AppError::from)?
            .into_iter()
            .map(|r| (r.id, r.name))
            .collect()
    };

    Ok(rows
        .into_iter()
        .map(|(model, joins)| Booking {
            id: model.id,
            user_id: model.user_id,
            status: BookingStatus::from(model.status.as_str()),
            created_at: model.created_at,
            start_date: model.start_date,
            end_date: model.end_date,
            total_price: model.total_price,
            rooms: joins
                .into_iter()
                .map(|j| BookedRoom {
                    room_id: j.room_id,
                    room_name: names.get(&j.room_id).cloned().unwrap_or_default(),
                    price_at_booking: j.price_at_booking,
                })
                .collect(),
        })
        .collect())
}

/// Concrete implementation of BookingRepository
pub struct BookingStore {
    db: DatabaseConnection,
}

impl BookingStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookingRepository for BookingStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        let rows = booking::Entity::find_by_id(id)
            .find_with_related(booking_room::Entity)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(hydrate(&self.db, rows).await?.into_iter().next())
    }

    async fn list_all(&self) -> AppResult<Vec<Booking>> {
        let rows = booking::Entity::find()
            .order_by_asc(booking::Column::CreatedAt)
            .find_with_related(booking_room::Entity)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        hydrate(&self.db, rows).await
    }

    async fn list_by_requester(&self, user_id: Uuid) -> AppResult<Vec<Booking>> {
        let rows = booking::Entity::find()
            .filter(booking::Column::UserId.eq(user_id))
            .order_by_asc(booking::Column::CreatedAt)
            .find_with_related(booking_room::Entity)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        hydrate(&self.db, rows).await
    }

    async fn set_status(&self, id: Uuid, status: BookingStatus) -> AppResult<()> {
        let active = booking::ActiveModel {
            id: Unchanged(id),
            status: Set(status.to_string()),
            ..Default::default()
        };

        active.update(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }
}
