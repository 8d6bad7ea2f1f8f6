//! Booking handlers.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{BookingResponse, Caller};
use crate::errors::AppResult;

/// Booking creation request.
///
/// Room set and date range rules are enforced by the booking service so
/// the structured errors (empty set, invalid range, conflicts) come back
/// with their own codes rather than as generic validation failures.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    /// Rooms to reserve together
    pub room_ids: Vec<Uuid>,
    /// First night, inclusive
    #[schema(example = "2025-07-01")]
    pub start_date: NaiveDate,
    /// Check-out day, exclusive
    #[schema(example = "2025-07-04")]
    pub end_date: NaiveDate,
}

/// Create booking routes
pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bookings).post(create_booking))
        .route("/:id", get(get_booking))
        .route("/:id/cancel", put(cancel_booking))
        .route("/:id/confirm", put(confirm_booking))
}

/// Reserve a set of rooms for a date range
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = BookingResponse),
        (status = 400, description = "Empty room set or invalid date range"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Room not found"),
        (status = 409, description = "Dates conflict with an existing booking"),
        (status = 422, description = "Requester not active or room unavailable")
    )
)]
pub async fn create_booking(
    Extension(caller): Extension<Caller>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<BookingResponse>)> {
    let booking = state
        .booking_service
        .create_booking(
            &caller,
            payload.room_ids,
            payload.start_date,
            payload.end_date,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

/// List bookings: all for admins, own otherwise
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Bookings", body = Vec<BookingResponse>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_bookings(
    Extension(caller): Extension<Caller>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let bookings = state.booking_service.list_bookings(&caller).await?;
    Ok(Json(
        bookings.into_iter().map(BookingResponse::from).collect(),
    ))
}

/// Get booking by ID (admin or requester)
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Booking details", body = BookingResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    Extension(caller): Extension<Caller>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookingResponse>> {
    let booking = state.booking_service.get_booking(&caller, id).await?;
    Ok(Json(BookingResponse::from(booking)))
}

/// Cancel a booking (admin or requester; repeat cancels are no-ops)
#[utoipa::path(
    put,
    path = "/bookings/{id}/cancel",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Booking cancelled", body = BookingResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Booking not found"),
        (status = 422, description = "Booking is completed")
    )
)]
pub async fn cancel_booking(
    Extension(caller): Extension<Caller>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookingResponse>> {
    let booking = state.booking_service.cancel_booking(&caller, id).await?;
    Ok(Json(BookingResponse::from(booking)))
}

/// Confirm a pending booking (admin only)
#[utoipa::path(
    put,
    path = "/bookings/{id}/confirm",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Booking confirmed", body = BookingResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Booking not found"),
        (status = 422, description = "Booking is not pending")
    )
)]
pub async fn confirm_booking(
    Extension(caller): Extension<Caller>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookingResponse>> {
    let booking = state.booking_service.confirm_booking(&caller, id).await?;
    Ok(Json(BookingResponse::from(booking)))
}
