//! Room domain entity and status state machine.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{
    ROOM_STATUS_ARCHIVED, ROOM_STATUS_AVAILABLE, ROOM_STATUS_BLOCKED, ROOM_STATUS_MAINTENANCE,
};
use crate::errors::{AppError, AppResult};

/// Room availability status.
///
/// Available ⇄ Maintenance by the owner or an admin; Blocked enters and
/// leaves only through owner block/unblock cascades or an admin; Archived
/// is terminal for everyone but an admin explicitly restoring the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Available,
    Maintenance,
    Blocked,
    Archived,
}

impl From<&str> for RoomStatus {
    fn from(s: &str) -> Self {
        match s {
            ROOM_STATUS_MAINTENANCE => RoomStatus::Maintenance,
            ROOM_STATUS_BLOCKED => RoomStatus::Blocked,
            ROOM_STATUS_ARCHIVED => RoomStatus::Archived,
            _ => RoomStatus::Available,
        }
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomStatus::Available => write!(f, "{}", ROOM_STATUS_AVAILABLE),
            RoomStatus::Maintenance => write!(f, "{}", ROOM_STATUS_MAINTENANCE),
            RoomStatus::Blocked => write!(f, "{}", ROOM_STATUS_BLOCKED),
            RoomStatus::Archived => write!(f, "{}", ROOM_STATUS_ARCHIVED),
        }
    }
}

/// Room domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub price_per_day: Decimal,
    pub status: RoomStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    /// Check if the room can accept new bookings
    pub fn is_available(&self) -> bool {
        self.status == RoomStatus::Available
    }

    /// Rename the room; the name is trimmed and must be non-empty.
    pub fn rename(&mut self, name: &str) -> AppResult<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(AppError::EmptyName);
        }
        self.name = trimmed.to_string();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Change the nightly price; must be non-negative.
    pub fn set_price(&mut self, price: Decimal) -> AppResult<()> {
        if price.is_sign_negative() {
            return Err(AppError::NegativePrice);
        }
        self.price_per_day = price;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Apply a status change requested by the given actor class.
    ///
    /// Admins may set any status. Owners may only toggle between
    /// Available and Maintenance; anything else is denied.
    pub fn set_status(&mut self, target: RoomStatus, actor_is_admin: bool) -> AppResult<()> {
        if !actor_is_admin
            && !matches!(target, RoomStatus::Available | RoomStatus::Maintenance)
        {
            return Err(AppError::Forbidden);
        }
        self.status = target;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Archive the room (terminal outside of admin restore). Fails if
    /// already archived.
    pub fn archive(&mut self) -> AppResult<()> {
        if self.status == RoomStatus::Archived {
            return Err(AppError::AlreadyArchived("Room"));
        }
        self.status = RoomStatus::Archived;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// New room data passed to the repository
#[derive(Debug, Clone)]
pub struct NewRoom {
    pub owner_id: Uuid,
    pub name: String,
    pub price_per_day: Decimal,
}

/// Room response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoomResponse {
    /// Unique room identifier
    pub id: Uuid,
    /// Owning user id
    pub owner_id: Uuid,
    /// Room display name
    pub name: String,
    /// Current nightly price
    #[schema(value_type = String, example = "100.00")]
    pub price_per_day: Decimal,
    /// Availability status
    pub status: RoomStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        Self {
            id: room.id,
            owner_id: room.owner_id,
            name: room.name,
            price_per_day: room.price_per_day,
            status: room.status,
            created_at: room.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(status: RoomStatus) -> Room {
        Room {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "Seaside".to_string(),
            price_per_day: Decimal::from(100),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn owner_may_only_toggle_available_and_maintenance() {
        let mut r = room(RoomStatus::Available);
        r.set_status(RoomStatus::Maintenance, false).unwrap();
        r.set_status(RoomStatus::Available, false).unwrap();

        assert!(matches!(
            r.set_status(RoomStatus::Archived, false),
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            r.set_status(RoomStatus::Blocked, false),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn admin_may_set_any_status() {
        let mut r = room(RoomStatus::Available);
        for target in [
            RoomStatus::Maintenance,
            RoomStatus::Blocked,
            RoomStatus::Archived,
            RoomStatus::Available,
        ] {
            r.set_status(target, true).unwrap();
            assert_eq!(r.status, target);
        }
    }

    #[test]
    fn rename_trims_and_rejects_empty() {
        let mut r = room(RoomStatus::Available);
        r.rename("  Ocean View  ").unwrap();
        assert_eq!(r.name, "Ocean View");
        assert!(matches!(r.rename("   "), Err(AppError::EmptyName)));
    }

    #[test]
    fn negative_price_rejected() {
        let mut r = room(RoomStatus::Available);
        assert!(matches!(
            r.set_price(Decimal::from(-1)),
            Err(AppError::NegativePrice)
        ));
        r.set_price(Decimal::ZERO).unwrap();
    }

    #[test]
    fn archive_is_one_way() {
        let mut r = room(RoomStatus::Maintenance);
        r.archive().unwrap();
        assert_eq!(r.status, RoomStatus::Archived);
        assert!(matches!(r.archive(), Err(AppError::AlreadyArchived("Room"))));
    }
}
