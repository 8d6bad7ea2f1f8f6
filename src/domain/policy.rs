//! Authorization policy.
//!
//! Role/ownership checks repeated across operations live here so every
//! service applies the same rules.

use uuid::Uuid;

use crate::domain::{User, UserRole, UserStatus};
use crate::errors::{AppError, AppResult};

/// Resolved caller identity flowing into every operation.
///
/// Built by the request layer from the verified token plus a fresh user
/// lookup, so role and status reflect the store, not the token.
#[derive(Debug, Clone)]
pub struct Caller {
    pub id: Uuid,
    pub role: UserRole,
    pub status: UserStatus,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

impl From<&User> for Caller {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role,
            status: user.status,
        }
    }
}

/// Allow only admins.
pub fn require_admin(actor: &Caller) -> AppResult<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Allow admins and the resource owner.
pub fn require_admin_or_owner(actor: &Caller, owner_id: Uuid) -> AppResult<()> {
    if actor.is_admin() || actor.id == owner_id {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Check whether the actor may see the resource at all (admins see
/// everything, owners see their own).
pub fn can_view(actor: &Caller, owner_id: Uuid) -> bool {
    actor.is_admin() || actor.id == owner_id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(role: UserRole) -> Caller {
        Caller {
            id: Uuid::new_v4(),
            role,
            status: UserStatus::Active,
        }
    }

    #[test]
    fn admin_passes_all_checks() {
        let admin = caller(UserRole::Admin);
        require_admin(&admin).unwrap();
        require_admin_or_owner(&admin, Uuid::new_v4()).unwrap();
        assert!(can_view(&admin, Uuid::new_v4()));
    }

    #[test]
    fn owner_passes_ownership_checks_only() {
        let user = caller(UserRole::User);
        assert!(matches!(require_admin(&user), Err(AppError::Forbidden)));
        require_admin_or_owner(&user, user.id).unwrap();
        assert!(matches!(
            require_admin_or_owner(&user, Uuid::new_v4()),
            Err(AppError::Forbidden)
        ));
        assert!(can_view(&user, user.id));
        assert!(!can_view(&user, Uuid::new_v4()));
    }
}
