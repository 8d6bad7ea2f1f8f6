//! Booking service - the reservation engine.
//!
//! Admission of a booking request runs its room checks and the overlap
//! probe inside one serializable transaction together with the insert,
//! so two concurrent requests for the same room and dates cannot both
//! pass the check.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    policy, stay_days, total_price, validate_range, validate_rooms, Booking, BookingStatus, Caller,
};
use crate::errors::{AppError, AppResult};
use crate::infra::{TxStore, UnitOfWork};

/// Booking service trait for dependency injection.
#[async_trait]
pub trait BookingService: Send + Sync {
    /// Reserve a set of rooms for [start, end)
    async fn create_booking(
        &self,
        actor: &Caller,
        room_ids: Vec<Uuid>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Booking>;

    /// Get a booking; admin any, requester their own
    async fn get_booking(&self, actor: &Caller, id: Uuid) -> AppResult<Booking>;

    /// List bookings; admin all, otherwise own
    async fn list_bookings(&self, actor: &Caller) -> AppResult<Vec<Booking>>;

    /// Cancel a booking; idempotent on already-cancelled
    async fn cancel_booking(&self, actor: &Caller, id: Uuid) -> AppResult<Booking>;

    /// Confirm a pending booking (admin)
    async fn confirm_booking(&self, actor: &Caller, id: Uuid) -> AppResult<Booking>;
}

/// Concrete implementation of BookingService using Unit of Work.
pub struct BookingManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> BookingManager<U> {
    /// Create new booking service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn find_required(&self, id: Uuid) -> AppResult<Booking> {
        self.uow
            .bookings()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Booking"))
    }
}

/// Collapse duplicate ids, keeping first-occurrence order
fn dedupe(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// The part of booking admission that must run atomically with the
/// insert: resolve the rooms, check availability and overlap, snapshot
/// prices, write the booking.
pub(crate) async fn admit_booking(
    store: &dyn TxStore,
    requester_id: Uuid,
    room_ids: &[Uuid],
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<Booking> {
    let rooms = store.find_rooms(room_ids.to_vec()).await?;
    validate_rooms(room_ids, &rooms)?;

    if store
        .has_active_overlap(room_ids.to_vec(), start, end)
        .await?
    {
        return Err(AppError::DateConflict);
    }

    // Snapshot rooms in request order.
    let ordered: Vec<_> = room_ids
        .iter()
        .filter_map(|id| rooms.iter().find(|r| r.id == *id).cloned())
        .collect();

    let days = stay_days(start, end);
    let prices: Vec<_> = ordered.iter().map(|r| r.price_per_day).collect();
    let total = total_price(&prices, days);

    store
        .insert_booking(requester_id, ordered, start, end, total)
        .await
}

#[async_trait]
impl<U: UnitOfWork> BookingService for BookingManager<U> {
    async fn create_booking(
        &self,
        actor: &Caller,
        room_ids: Vec<Uuid>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Booking> {
        let requester = self
            .uow
            .users()
            .find_by_id(actor.id)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        if !requester.is_active() {
            return Err(AppError::RequesterNotActive);
        }

        let room_ids = dedupe(room_ids);
        if room_ids.is_empty() {
            return Err(AppError::EmptyRoomSet);
        }

        validate_range(start, end)?;

        let requester_id = requester.id;
        let result = self
            .uow
            .transaction_serializable(move |ctx| {
                Box::pin(async move { admit_booking(&ctx, requester_id, &room_ids, start, end).await })
            })
            .await;

        // The loser of two concurrent admissions is aborted by the
        // database before its overlap check can see the winner; report
        // it as the same conflict.
        let booking = match result {
            Err(e) if e.is_serialization_failure() => return Err(AppError::DateConflict),
            other => other?,
        };

        tracing::info!(
            booking_id = %booking.id,
            user_id = %requester_id,
            rooms = booking.rooms.len(),
            total = %booking.total_price,
            "booking created"
        );
        Ok(booking)
    }

    async fn get_booking(&self, actor: &Caller, id: Uuid) -> AppResult<Booking> {
        let booking = self.find_required(id).await?;

        // Hide the existence of other users' bookings.
        if !policy::can_view(actor, booking.user_id) {
            return Err(AppError::NotFound("Booking"));
        }

        Ok(booking)
    }

    async fn list_bookings(&self, actor: &Caller) -> AppResult<Vec<Booking>> {
        if actor.is_admin() {
            self.uow.bookings().list_all().await
        } else {
            self.uow.bookings().list_by_requester(actor.id).await
        }
    }

    async fn cancel_booking(&self, actor: &Caller, id: Uuid) -> AppResult<Booking> {
        let mut booking = self.find_required(id).await?;

        policy::require_admin_or_owner(actor, booking.user_id)?;

        let already_cancelled = booking.status == BookingStatus::Cancelled;
        booking.cancel()?;

        if !already_cancelled {
            self.uow
                .bookings()
                .set_status(booking.id, BookingStatus::Cancelled)
                .await?;
        }

        Ok(booking)
    }

    async fn confirm_booking(&self, actor: &Caller, id: Uuid) -> AppResult<Booking> {
        policy::require_admin(actor)?;

        let mut booking = self.find_required(id).await?;
        booking.confirm()?;

        self.uow
            .bookings()
            .set_status(booking.id, BookingStatus::Confirmed)
            .await?;

        Ok(booking)
    }
}
