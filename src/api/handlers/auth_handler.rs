//! Authentication handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::AppResult;
use crate::services::{RegisterInput, TokenResponse};

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// User password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    /// User display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "John Doe")]
    pub name: String,
    /// Optional Telegram account id
    pub telegram_id: Option<i64>,
    /// Optional Telegram username
    #[schema(example = "johndoe")]
    pub telegram_username: Option<String>,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// User password
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Authentication response: the profile plus a ready-to-use token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: TokenResponse,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/telegram/:tg_id", get(telegram_login))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let email = payload.email.clone();
    let password = payload.password.clone();

    let user = state
        .auth_service
        .register(RegisterInput {
            email: payload.email,
            password: payload.password,
            name: payload.name,
            telegram_id: payload.telegram_id,
            telegram_username: payload.telegram_username,
        })
        .await?;

    let token = state.auth_service.login(email, password).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserResponse::from(user),
            token,
        }),
    ))
}

/// Login with a linked Telegram account id
#[utoipa::path(
    get,
    path = "/auth/telegram/{tg_id}",
    tag = "Authentication",
    params(
        ("tg_id" = i64, Path, description = "Telegram account id")
    ),
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Account is not active"),
        (status = 404, description = "No account linked to this Telegram id")
    )
)]
pub async fn telegram_login(
    State(state): State<AppState>,
    Path(tg_id): Path<i64>,
) -> AppResult<Json<AuthResponse>> {
    let (user, token) = state.auth_service.login_by_telegram(tg_id).await?;

    Ok(Json(AuthResponse {
        user: UserResponse::from(user),
        token,
    }))
}

/// Login and get JWT token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(token))
}
