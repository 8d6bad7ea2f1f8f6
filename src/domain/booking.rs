//! Booking domain entity, the status state machine, and the
//! availability rules (half-open interval overlap, price snapshots).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{
    BOOKING_STATUS_CANCELLED, BOOKING_STATUS_COMPLETED, BOOKING_STATUS_CONFIRMED,
    BOOKING_STATUS_PENDING,
};
use crate::domain::Room;
use crate::errors::{AppError, AppResult};

/// Booking lifecycle status.
///
/// Pending → Confirmed (admin); Pending|Confirmed → Cancelled (requester,
/// admin, or cascade). Cancelled and Completed are terminal. Completed has
/// no transition into it here; it is reserved for an external time-based
/// process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Statuses that hold a room against other bookings
    pub const ACTIVE: [BookingStatus; 2] = [BookingStatus::Pending, BookingStatus::Confirmed];

    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

impl From<&str> for BookingStatus {
    fn from(s: &str) -> Self {
        match s {
            BOOKING_STATUS_CONFIRMED => BookingStatus::Confirmed,
            BOOKING_STATUS_CANCELLED => BookingStatus::Cancelled,
            BOOKING_STATUS_COMPLETED => BookingStatus::Completed,
            _ => BookingStatus::Pending,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "{}", BOOKING_STATUS_PENDING),
            BookingStatus::Confirmed => write!(f, "{}", BOOKING_STATUS_CONFIRMED),
            BookingStatus::Cancelled => write!(f, "{}", BOOKING_STATUS_CANCELLED),
            BookingStatus::Completed => write!(f, "{}", BOOKING_STATUS_COMPLETED),
        }
    }
}

/// Room snapshot carried by a booking.
///
/// `price_at_booking` is captured when the booking is created and never
/// changes afterwards; `room_name` reflects the room as of the read.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookedRoom {
    pub room_id: Uuid,
    pub room_name: String,
    #[schema(value_type = String, example = "100.00")]
    pub price_at_booking: Decimal,
}

/// Booking domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: Decimal,
    pub rooms: Vec<BookedRoom>,
}

impl Booking {
    /// Cancel the booking.
    ///
    /// Idempotent on already-Cancelled bookings; Completed bookings are
    /// terminal and cannot be cancelled.
    pub fn cancel(&mut self) -> AppResult<()> {
        match self.status {
            BookingStatus::Cancelled => Ok(()),
            BookingStatus::Completed => Err(AppError::InvalidTransition(
                "completed bookings cannot be cancelled",
            )),
            _ => {
                self.status = BookingStatus::Cancelled;
                Ok(())
            }
        }
    }

    /// Confirm the booking; only Pending bookings may be confirmed.
    pub fn confirm(&mut self) -> AppResult<()> {
        if self.status != BookingStatus::Pending {
            return Err(AppError::InvalidTransition(
                "only pending bookings can be confirmed",
            ));
        }
        self.status = BookingStatus::Confirmed;
        Ok(())
    }
}

/// Half-open interval overlap: [s1, e1) and [s2, e2) intersect iff
/// s1 < e2 and s2 < e1. Touching at a boundary is not an overlap.
pub fn ranges_overlap(s1: NaiveDate, e1: NaiveDate, s2: NaiveDate, e2: NaiveDate) -> bool {
    s1 < e2 && s2 < e1
}

/// Whole-day count of a stay. Positive only when end is after start.
pub fn stay_days(start: NaiveDate, end: NaiveDate) -> i64 {
    end.signed_duration_since(start).num_days()
}

/// Validate a requested date range: at least one whole day.
pub fn validate_range(start: NaiveDate, end: NaiveDate) -> AppResult<()> {
    if start >= end {
        return Err(AppError::InvalidRange);
    }
    Ok(())
}

/// Check that every requested room id resolved and all rooms are bookable.
///
/// All-or-nothing: a single missing id fails the whole request; the first
/// non-Available room is reported by id.
pub fn validate_rooms(requested: &[Uuid], rooms: &[Room]) -> AppResult<()> {
    if rooms.len() != requested.len() {
        return Err(AppError::NotFound("Room"));
    }
    if let Some(unavailable) = rooms.iter().find(|r| !r.is_available()) {
        return Err(AppError::RoomUnavailable(unavailable.id));
    }
    Ok(())
}

/// Total price: Σ over rooms of price-at-booking × whole-day count.
pub fn total_price(prices: &[Decimal], days: i64) -> Decimal {
    let days = Decimal::from(days);
    prices.iter().map(|p| p * days).sum()
}

/// Booking response returned to clients, rooms included
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingResponse {
    /// Unique booking identifier
    pub id: Uuid,
    /// Requesting user id
    pub user_id: Uuid,
    /// Booking status
    pub status: BookingStatus,
    /// Creation timestamp (immutable)
    pub created_at: DateTime<Utc>,
    /// First night of the stay
    pub start_date: NaiveDate,
    /// Day after the last night (half-open)
    pub end_date: NaiveDate,
    /// Total price captured at creation
    #[schema(value_type = String, example = "300.00")]
    pub total_price: Decimal,
    /// Booked rooms with their price snapshots
    pub rooms: Vec<BookedRoom>,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            user_id: b.user_id,
            status: b.status,
            created_at: b.created_at,
            start_date: b.start_date,
            end_date: b.end_date,
            total_price: b.total_price,
            rooms: b.rooms,
        }
    }
}
