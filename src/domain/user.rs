//! User domain entity and lifecycle state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{
    ROLE_ADMIN, ROLE_USER, USER_STATUS_ACTIVE, USER_STATUS_ARCHIVED, USER_STATUS_BLOCKED,
};
use crate::errors::{AppError, AppResult};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => UserRole::Admin,
            _ => UserRole::User,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", ROLE_ADMIN),
            UserRole::User => write!(f, "{}", ROLE_USER),
        }
    }
}

/// User lifecycle status.
///
/// Active ⇄ Blocked via block/unblock; Archived is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Blocked,
    Archived,
}

impl From<&str> for UserStatus {
    fn from(s: &str) -> Self {
        match s {
            USER_STATUS_BLOCKED => UserStatus::Blocked,
            USER_STATUS_ARCHIVED => UserStatus::Archived,
            _ => UserStatus::Active,
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "{}", USER_STATUS_ACTIVE),
            UserStatus::Blocked => write!(f, "{}", USER_STATUS_BLOCKED),
            UserStatus::Archived => write!(f, "{}", USER_STATUS_ARCHIVED),
        }
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub status: UserStatus,
    /// Optional external chat-platform linkage, pass-through only
    pub telegram_id: Option<i64>,
    pub telegram_username: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Check if user may authenticate and transact
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// Archive the user (terminal). Fails if already archived.
    pub fn archive(&mut self) -> AppResult<()> {
        if self.status == UserStatus::Archived {
            return Err(AppError::AlreadyArchived("User"));
        }
        self.status = UserStatus::Archived;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Block the user. Archived users cannot be blocked.
    pub fn block(&mut self) -> AppResult<()> {
        if self.status == UserStatus::Archived {
            return Err(AppError::InvalidTransition(
                "archived users cannot be blocked",
            ));
        }
        self.status = UserStatus::Blocked;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Unblock the user back to Active. Archived users cannot be restored.
    pub fn unblock(&mut self) -> AppResult<()> {
        if self.status == UserStatus::Archived {
            return Err(AppError::InvalidTransition(
                "archived users cannot be unblocked",
            ));
        }
        self.status = UserStatus::Active;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// New user data passed to the repository on registration
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub telegram_id: Option<i64>,
    pub telegram_username: Option<String>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    pub id: Uuid,
    /// User email address
    pub email: String,
    /// User display name
    pub name: String,
    /// User role
    pub role: UserRole,
    /// Lifecycle status
    pub status: UserStatus,
    /// Linked Telegram account id, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_id: Option<i64>,
    /// Linked Telegram username, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_username: Option<String>,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            status: user.status,
            telegram_id: user.telegram_id,
            telegram_username: user.telegram_username,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(status: UserStatus) -> User {
        User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            password_hash: "hashed".to_string(),
            name: "Test User".to_string(),
            role: UserRole::User,
            status,
            telegram_id: None,
            telegram_username: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn archive_is_one_way() {
        let mut u = user(UserStatus::Active);
        u.archive().unwrap();
        assert_eq!(u.status, UserStatus::Archived);

        assert!(matches!(u.archive(), Err(AppError::AlreadyArchived("User"))));
        assert!(matches!(u.block(), Err(AppError::InvalidTransition(_))));
        assert!(matches!(u.unblock(), Err(AppError::InvalidTransition(_))));
    }

    #[test]
    fn block_and_unblock_round_trip() {
        let mut u = user(UserStatus::Active);
        u.block().unwrap();
        assert_eq!(u.status, UserStatus::Blocked);
        u.unblock().unwrap();
        assert_eq!(u.status, UserStatus::Active);
    }

    #[test]
    fn blocked_user_can_still_be_archived() {
        let mut u = user(UserStatus::Blocked);
        u.archive().unwrap();
        assert_eq!(u.status, UserStatus::Archived);
    }

    #[test]
    fn status_string_round_trip() {
        for status in [UserStatus::Active, UserStatus::Blocked, UserStatus::Archived] {
            assert_eq!(UserStatus::from(status.to_string().as_str()), status);
        }
    }
}
