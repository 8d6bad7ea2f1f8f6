//! User service - profiles and account lifecycle moderation.
//!
//! Archiving and blocking cascade into the user's rooms and bookings;
//! each cascade runs inside a single transaction so a failure midway
//! leaves the account untouched.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{policy, Caller, RoomStatus, User, UserRole, UserStatus};
use crate::errors::{AppError, AppResult};
use crate::infra::{TxStore, UnitOfWork};

/// Profile update input. `role` and `status` are honored only when the
/// actor is an administrator; moderation endpoints carry the cascades.
#[derive(Debug, Default)]
pub struct UpdateUserInput {
    pub email: Option<String>,
    pub name: Option<String>,
    pub telegram_id: Option<i64>,
    pub telegram_username: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
}

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Resolve the caller identity for an authenticated request
    async fn caller(&self, id: Uuid) -> AppResult<Caller>;

    /// Get a user by ID; archived users are visible to admins only
    async fn get_user(&self, actor: &Caller, id: Uuid) -> AppResult<User>;

    /// List active users (admin)
    async fn list_users(&self, actor: &Caller) -> AppResult<Vec<User>>;

    /// Update profile fields; self or admin
    async fn update_profile(
        &self,
        actor: &Caller,
        target_id: Uuid,
        input: UpdateUserInput,
    ) -> AppResult<User>;

    /// Archive a user and cascade into their rooms and bookings (admin)
    async fn archive_user(&self, actor: &Caller, target_id: Uuid) -> AppResult<User>;

    /// Block a user and cascade into their rooms and bookings (admin)
    async fn block_user(&self, actor: &Caller, target_id: Uuid) -> AppResult<User>;

    /// Unblock a user and restore their blocked rooms (admin)
    async fn unblock_user(&self, actor: &Caller, target_id: Uuid) -> AppResult<User>;
}

/// Archive cascade: persist the archived user, archive their rooms,
/// cancel their active bookings.
pub(crate) async fn apply_archive_cascade(store: &dyn TxStore, user: &User) -> AppResult<User> {
    let saved = store.save_user(user).await?;
    let rooms = store.archive_owned_rooms(saved.id).await?;
    let bookings = store.cancel_bookings_by_requester(saved.id).await?;
    tracing::info!(
        user_id = %saved.id,
        rooms_archived = rooms,
        bookings_cancelled = bookings,
        "user archived"
    );
    Ok(saved)
}

/// Block cascade: persist the blocked user, take their Available rooms
/// off the market, cancel their active bookings.
pub(crate) async fn apply_block_cascade(store: &dyn TxStore, user: &User) -> AppResult<User> {
    let saved = store.save_user(user).await?;
    store
        .transition_owned_rooms(saved.id, RoomStatus::Available, RoomStatus::Blocked)
        .await?;
    store.cancel_bookings_by_requester(saved.id).await?;
    Ok(saved)
}

/// Unblock cascade: persist the restored user and bring back the rooms
/// the block cascade took. Rooms parked in Maintenance or Archived stay
/// where they are; cancelled bookings stay cancelled.
pub(crate) async fn apply_unblock_cascade(store: &dyn TxStore, user: &User) -> AppResult<User> {
    let saved = store.save_user(user).await?;
    store
        .transition_owned_rooms(saved.id, RoomStatus::Blocked, RoomStatus::Available)
        .await?;
    Ok(saved)
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn find_required(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("User"))
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn caller(&self, id: Uuid) -> AppResult<Caller> {
        let user = self
            .uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        // A token minted before archival must not keep working.
        if user.status == UserStatus::Archived {
            return Err(AppError::Unauthorized);
        }

        Ok(Caller::from(&user))
    }

    async fn get_user(&self, actor: &Caller, id: Uuid) -> AppResult<User> {
        let user = self.find_required(id).await?;

        if user.status == UserStatus::Archived && !actor.is_admin() {
            return Err(AppError::NotFound("User"));
        }

        Ok(user)
    }

    async fn list_users(&self, actor: &Caller) -> AppResult<Vec<User>> {
        policy::require_admin(actor)?;
        self.uow.users().list_active().await
    }

    async fn update_profile(
        &self,
        actor: &Caller,
        target_id: Uuid,
        input: UpdateUserInput,
    ) -> AppResult<User> {
        let mut user = self.find_required(target_id).await?;

        policy::require_admin_or_owner(actor, target_id)?;

        if user.status == UserStatus::Archived {
            return Err(AppError::AlreadyArchived("User"));
        }

        if let Some(email) = input.email {
            if email != user.email {
                if self.uow.users().find_by_email(&email).await?.is_some() {
                    return Err(AppError::DuplicateEmail);
                }
                user.email = email;
            }
        }

        if let Some(name) = input.name {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(AppError::EmptyName);
            }
            user.name = trimmed.to_string();
        }

        if let Some(telegram_id) = input.telegram_id {
            user.telegram_id = Some(telegram_id);
        }
        if let Some(telegram_username) = input.telegram_username {
            user.telegram_username = Some(telegram_username);
        }

        if actor.is_admin() {
            if let Some(role) = input.role {
                user.role = role;
            }
            if let Some(status) = input.status {
                // Plain transition without cascades; the moderation
                // endpoints are the cascading path.
                match status {
                    UserStatus::Active => user.unblock()?,
                    UserStatus::Blocked => user.block()?,
                    UserStatus::Archived => user.archive()?,
                }
            }
        }

        user.updated_at = chrono::Utc::now();
        self.uow.users().save(&user).await
    }

    async fn archive_user(&self, actor: &Caller, target_id: Uuid) -> AppResult<User> {
        policy::require_admin(actor)?;

        let mut user = self.find_required(target_id).await?;
        user.archive()?;
        user.updated_at = chrono::Utc::now();

        self.uow
            .transaction(move |ctx| Box::pin(async move { apply_archive_cascade(&ctx, &user).await }))
            .await
    }

    async fn block_user(&self, actor: &Caller, target_id: Uuid) -> AppResult<User> {
        policy::require_admin(actor)?;

        let mut user = self.find_required(target_id).await?;
        user.block()?;
        user.updated_at = chrono::Utc::now();

        self.uow
            .transaction(move |ctx| Box::pin(async move { apply_block_cascade(&ctx, &user).await }))
            .await
    }

    async fn unblock_user(&self, actor: &Caller, target_id: Uuid) -> AppResult<User> {
        policy::require_admin(actor)?;

        let mut user = self.find_required(target_id).await?;
        user.unblock()?;
        user.updated_at = chrono::Utc::now();

        self.uow
            .transaction(move |ctx| Box::pin(async move { apply_unblock_cascade(&ctx, &user).await }))
            .await
    }
}
