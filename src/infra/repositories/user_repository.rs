//! User repository implementation.

use async_trait::async_trait;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::config::ROLE_USER;
use crate::domain::{NewUser, User, UserStatus};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Lookups never filter by status; visibility rules live in the services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email address (case-sensitive exact match)
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find user by linked Telegram account id
    async fn find_by_telegram_id(&self, telegram_id: i64) -> AppResult<Option<User>>;

    /// Create a new user with role User, status Active
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    /// Persist the mutable fields of a user
    async fn save(&self, user: &User) -> AppResult<User>;

    /// List all active users
    async fn list_active(&self) -> AppResult<Vec<User>>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Build the write model for an existing user
fn to_active_model(user: &User) -> ActiveModel {
    ActiveModel {
        id: Unchanged(user.id),
        email: Set(user.email.clone()),
        password_hash: Set(user.password_hash.clone()),
        name: Set(user.name.clone()),
        role: Set(user.role.to_string()),
        status: Set(user.status.to_string()),
        telegram_id: Set(user.telegram_id),
        telegram_username: Set(user.telegram_username.clone()),
        created_at: Unchanged(user.created_at),
        updated_at: Set(user.updated_at),
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_telegram_id(&self, telegram_id: i64) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::TelegramId.eq(telegram_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            name: Set(new_user.name),
            role: Set(ROLE_USER.to_string()),
            status: Set(UserStatus::Active.to_string()),
            telegram_id: Set(new_user.telegram_id),
            telegram_username: Set(new_user.telegram_username),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }

    async fn save(&self, user: &User) -> AppResult<User> {
        let model = to_active_model(user)
            .update(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(User::from(model))
    }

    async fn list_active(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .filter(user::Column::Status.eq(UserStatus::Active.to_string()))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }
}
