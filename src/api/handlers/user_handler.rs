//! User handlers.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::{ROLE_ADMIN, ROLE_USER, USER_STATUS_ACTIVE, USER_STATUS_BLOCKED};
use crate::domain::{Caller, UserResponse, UserRole, UserStatus};
use crate::errors::{AppError, AppResult};
use crate::services::UpdateUserInput;

/// User update request with validation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    /// New email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: Option<String>,
    /// New display name
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
    /// New Telegram account id
    pub telegram_id: Option<i64>,
    /// New Telegram username
    pub telegram_username: Option<String>,
    /// New role (admin only)
    #[schema(example = "admin")]
    pub role: Option<String>,
    /// New status (admin only; "active" or "blocked")
    #[schema(example = "active")]
    pub status: Option<String>,
}

fn parse_role(value: &str) -> AppResult<UserRole> {
    match value {
        ROLE_ADMIN => Ok(UserRole::Admin),
        ROLE_USER => Ok(UserRole::User),
        other => Err(AppError::validation(format!("Unknown role: {other}"))),
    }
}

fn parse_status(value: &str) -> AppResult<UserStatus> {
    match value {
        USER_STATUS_ACTIVE => Ok(UserStatus::Active),
        USER_STATUS_BLOCKED => Ok(UserStatus::Blocked),
        other => Err(AppError::validation(format!("Unknown status: {other}"))),
    }
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/me", get(get_current_user))
        .route("/:id", get(get_user).put(update_user))
        .route("/:id/archive", put(archive_user))
        .route("/:id/block", put(block_user))
        .route("/:id/unblock", put(unblock_user))
}

/// Get current authenticated user
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_current_user(
    Extension(caller): Extension<Caller>,
    State(state): State<AppState>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user(&caller, caller.id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// List active users (admin only)
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of active users", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_users(
    Extension(caller): Extension<Caller>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.user_service.list_users(&caller).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    Extension(caller): Extension<Caller>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user(&caller, id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Update a user profile (self or admin)
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "User is archived")
    )
)]
pub async fn update_user(
    Extension(caller): Extension<Caller>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let input = UpdateUserInput {
        email: payload.email,
        name: payload.name,
        telegram_id: payload.telegram_id,
        telegram_username: payload.telegram_username,
        role: payload.role.as_deref().map(parse_role).transpose()?,
        status: payload.status.as_deref().map(parse_status).transpose()?,
    };

    let user = state.user_service.update_profile(&caller, id, input).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Archive a user and cascade into their rooms and bookings (admin only)
#[utoipa::path(
    put,
    path = "/users/{id}/archive",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User archived", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "User not found"),
        (status = 422, description = "Already archived")
    )
)]
pub async fn archive_user(
    Extension(caller): Extension<Caller>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.archive_user(&caller, id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Block a user and cancel their active bookings (admin only)
#[utoipa::path(
    put,
    path = "/users/{id}/block",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User blocked", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "User not found"),
        (status = 422, description = "User is archived")
    )
)]
pub async fn block_user(
    Extension(caller): Extension<Caller>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.block_user(&caller, id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Unblock a user and restore their blocked rooms (admin only)
#[utoipa::path(
    put,
    path = "/users/{id}/unblock",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User unblocked", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "User not found"),
        (status = 422, description = "User is archived")
    )
)]
pub async fn unblock_user(
    Extension(caller): Extension<Caller>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.unblock_user(&caller, id).await?;
    Ok(Json(UserResponse::from(user)))
}
