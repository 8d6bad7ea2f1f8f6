//! Room handlers.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::{
    ROOM_STATUS_AVAILABLE, ROOM_STATUS_BLOCKED, ROOM_STATUS_MAINTENANCE,
};
use crate::domain::{Caller, RoomResponse, RoomStatus};
use crate::errors::{AppError, AppResult};
use crate::services::UpdateRoomInput;
use crate::types::MessageResponse;

/// Room creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoomRequest {
    /// Room display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Lakeside cabin")]
    pub name: String,
    /// Price per day
    #[schema(value_type = String, example = "100.00")]
    pub price_per_day: Decimal,
}

/// Room update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRoomRequest {
    /// New display name
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    #[schema(example = "Lakeside cabin")]
    pub name: Option<String>,
    /// New price per day
    #[schema(value_type = String, example = "120.00")]
    pub price_per_day: Option<Decimal>,
    /// New status ("available", "maintenance"; admins also "blocked")
    #[schema(example = "maintenance")]
    pub status: Option<String>,
    /// New owner (admin only)
    pub owner_id: Option<Uuid>,
}

fn parse_status(value: &str) -> AppResult<RoomStatus> {
    match value {
        ROOM_STATUS_AVAILABLE => Ok(RoomStatus::Available),
        ROOM_STATUS_MAINTENANCE => Ok(RoomStatus::Maintenance),
        ROOM_STATUS_BLOCKED => Ok(RoomStatus::Blocked),
        other => Err(AppError::validation(format!("Unknown status: {other}"))),
    }
}

/// Create room routes
pub fn room_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_room))
        .route("/available", get(list_available))
        .route("/:id", get(get_room).put(update_room).delete(archive_room))
}

/// Create a room owned by the caller
#[utoipa::path(
    post,
    path = "/rooms",
    tag = "Rooms",
    security(("bearer_auth" = [])),
    request_body = CreateRoomRequest,
    responses(
        (status = 201, description = "Room created", body = RoomResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Owner is not active")
    )
)]
pub async fn create_room(
    Extension(caller): Extension<Caller>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateRoomRequest>,
) -> AppResult<(StatusCode, Json<RoomResponse>)> {
    let room = state
        .room_service
        .create_room(&caller, payload.name, payload.price_per_day)
        .await?;

    Ok((StatusCode::CREATED, Json(RoomResponse::from(room))))
}

/// List rooms open for booking
#[utoipa::path(
    get,
    path = "/rooms/available",
    tag = "Rooms",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Available rooms", body = Vec<RoomResponse>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_available(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<RoomResponse>>> {
    let rooms = state.room_service.list_available().await?;
    Ok(Json(rooms.into_iter().map(RoomResponse::from).collect()))
}

/// Get room by ID
#[utoipa::path(
    get,
    path = "/rooms/{id}",
    tag = "Rooms",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Room ID")
    ),
    responses(
        (status = 200, description = "Room details", body = RoomResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Room not found")
    )
)]
pub async fn get_room(
    Extension(caller): Extension<Caller>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RoomResponse>> {
    let room = state.room_service.get_room(&caller, id).await?;
    Ok(Json(RoomResponse::from(room)))
}

/// Update a room (owner or admin)
#[utoipa::path(
    put,
    path = "/rooms/{id}",
    tag = "Rooms",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Room ID")
    ),
    request_body = UpdateRoomRequest,
    responses(
        (status = 200, description = "Room updated", body = RoomResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Room not found"),
        (status = 422, description = "Room is archived")
    )
)]
pub async fn update_room(
    Extension(caller): Extension<Caller>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateRoomRequest>,
) -> AppResult<Json<RoomResponse>> {
    let input = UpdateRoomInput {
        name: payload.name,
        price_per_day: payload.price_per_day,
        status: payload.status.as_deref().map(parse_status).transpose()?,
        owner_id: payload.owner_id,
    };

    let room = state.room_service.update_room(&caller, id, input).await?;
    Ok(Json(RoomResponse::from(room)))
}

/// Archive a room and cancel active bookings referencing it (admin only)
#[utoipa::path(
    delete,
    path = "/rooms/{id}",
    tag = "Rooms",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Room ID")
    ),
    responses(
        (status = 200, description = "Room archived", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Room not found"),
        (status = 422, description = "Already archived")
    )
)]
pub async fn archive_room(
    Extension(caller): Extension<Caller>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.room_service.archive_room(&caller, id).await?;
    Ok(Json(MessageResponse::new("Room archived")))
}
