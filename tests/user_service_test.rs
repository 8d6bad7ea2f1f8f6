//! User service tests: visibility, profile updates, and the
//! authorization rules around moderation.

mod common;

use std::sync::Arc;

use mockall::predicate::eq;
use uuid::Uuid;

use roomstay::domain::{UserRole, UserStatus};
use roomstay::errors::AppError;
use roomstay::services::{UpdateUserInput, UserManager, UserService};

use common::{admin_caller, test_user, user_caller, MockUserRepo, TestUnitOfWork};

fn service(repo: MockUserRepo) -> UserManager<TestUnitOfWork> {
    UserManager::new(Arc::new(TestUnitOfWork::with_users(repo)))
}

#[tokio::test]
async fn caller_resolution_rejects_unknown_and_archived() {
    let archived_id = Uuid::new_v4();

    let mut repo = MockUserRepo::new();
    repo.expect_find_by_id().returning(move |id| {
        if id == archived_id {
            Ok(Some(test_user(id, UserRole::User, UserStatus::Archived)))
        } else {
            Ok(None)
        }
    });

    let service = service(repo);

    let unknown = service.caller(Uuid::new_v4()).await;
    assert!(matches!(unknown.unwrap_err(), AppError::Unauthorized));

    let archived = service.caller(archived_id).await;
    assert!(matches!(archived.unwrap_err(), AppError::Unauthorized));
}

#[tokio::test]
async fn caller_resolution_keeps_blocked_users() {
    let id = Uuid::new_v4();

    let mut repo = MockUserRepo::new();
    repo.expect_find_by_id()
        .with(eq(id))
        .returning(|id| Ok(Some(test_user(id, UserRole::User, UserStatus::Blocked))));

    let caller = service(repo).caller(id).await.unwrap();
    assert!(!caller.is_active());
}

#[tokio::test]
async fn archived_users_are_invisible_to_non_admins() {
    let id = Uuid::new_v4();

    let mut repo = MockUserRepo::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(test_user(id, UserRole::User, UserStatus::Archived))));

    let service = service(repo);

    let hidden = service.get_user(&user_caller(Uuid::new_v4()), id).await;
    assert!(matches!(hidden.unwrap_err(), AppError::NotFound("User")));

    let visible = service.get_user(&admin_caller(), id).await.unwrap();
    assert_eq!(visible.id, id);
}

#[tokio::test]
async fn list_users_is_admin_only() {
    let mut repo = MockUserRepo::new();
    repo.expect_list_active().returning(|| {
        Ok(vec![
            test_user(Uuid::new_v4(), UserRole::User, UserStatus::Active),
            test_user(Uuid::new_v4(), UserRole::User, UserStatus::Active),
        ])
    });

    let service = service(repo);

    let denied = service.list_users(&user_caller(Uuid::new_v4())).await;
    assert!(matches!(denied.unwrap_err(), AppError::Forbidden));

    let users = service.list_users(&admin_caller()).await.unwrap();
    assert_eq!(users.len(), 2);
}

#[tokio::test]
async fn update_profile_requires_self_or_admin() {
    let target_id = Uuid::new_v4();

    let mut repo = MockUserRepo::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(test_user(id, UserRole::User, UserStatus::Active))));

    let result = service(repo)
        .update_profile(
            &user_caller(Uuid::new_v4()),
            target_id,
            UpdateUserInput::default(),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn update_profile_rejects_archived_targets() {
    let target_id = Uuid::new_v4();

    let mut repo = MockUserRepo::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(test_user(id, UserRole::User, UserStatus::Archived))));

    let result = service(repo)
        .update_profile(&admin_caller(), target_id, UpdateUserInput::default())
        .await;

    assert!(matches!(
        result.unwrap_err(),
        AppError::AlreadyArchived("User")
    ));
}

#[tokio::test]
async fn update_profile_rejects_taken_email() {
    let target_id = Uuid::new_v4();

    let mut repo = MockUserRepo::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(test_user(id, UserRole::User, UserStatus::Active))));
    repo.expect_find_by_email()
        .with(eq("taken@example.com"))
        .returning(|_| {
            Ok(Some(test_user(
                Uuid::new_v4(),
                UserRole::User,
                UserStatus::Active,
            )))
        });

    let result = service(repo)
        .update_profile(
            &user_caller(target_id),
            target_id,
            UpdateUserInput {
                email: Some("taken@example.com".to_string()),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::DuplicateEmail));
}

#[tokio::test]
async fn role_changes_are_ignored_for_non_admins() {
    let target_id = Uuid::new_v4();

    let mut repo = MockUserRepo::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(test_user(id, UserRole::User, UserStatus::Active))));
    repo.expect_save().returning(|u| Ok(u.clone()));

    let updated = service(repo)
        .update_profile(
            &user_caller(target_id),
            target_id,
            UpdateUserInput {
                role: Some(UserRole::Admin),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.role, UserRole::User);
}

#[tokio::test]
async fn admin_can_change_role_and_status() {
    let target_id = Uuid::new_v4();

    let mut repo = MockUserRepo::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(test_user(id, UserRole::User, UserStatus::Active))));
    repo.expect_save().returning(|u| Ok(u.clone()));

    let updated = service(repo)
        .update_profile(
            &admin_caller(),
            target_id,
            UpdateUserInput {
                role: Some(UserRole::Admin),
                status: Some(UserStatus::Blocked),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.role, UserRole::Admin);
    assert_eq!(updated.status, UserStatus::Blocked);
}

#[tokio::test]
async fn moderation_endpoints_are_admin_only() {
    let target_id = Uuid::new_v4();
    let actor = user_caller(Uuid::new_v4());

    let service = service(MockUserRepo::new());

    for result in [
        service.archive_user(&actor, target_id).await,
        service.block_user(&actor, target_id).await,
        service.unblock_user(&actor, target_id).await,
    ] {
        assert!(matches!(result.unwrap_err(), AppError::Forbidden));
    }
}

#[tokio::test]
async fn archive_fails_on_missing_or_already_archived_target() {
    let archived_id = Uuid::new_v4();

    let mut repo = MockUserRepo::new();
    repo.expect_find_by_id().returning(move |id| {
        if id == archived_id {
            Ok(Some(test_user(id, UserRole::User, UserStatus::Archived)))
        } else {
            Ok(None)
        }
    });

    let service = service(repo);

    let missing = service.archive_user(&admin_caller(), Uuid::new_v4()).await;
    assert!(matches!(missing.unwrap_err(), AppError::NotFound("User")));

    let repeat = service.archive_user(&admin_caller(), archived_id).await;
    assert!(matches!(
        repeat.unwrap_err(),
        AppError::AlreadyArchived("User")
    ));
}

#[tokio::test]
async fn block_and_unblock_reject_archived_targets() {
    let mut repo = MockUserRepo::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(test_user(id, UserRole::User, UserStatus::Archived))));

    let service = service(repo);
    let target_id = Uuid::new_v4();

    let blocked = service.block_user(&admin_caller(), target_id).await;
    assert!(matches!(
        blocked.unwrap_err(),
        AppError::InvalidTransition(_)
    ));

    let unblocked = service.unblock_user(&admin_caller(), target_id).await;
    assert!(matches!(
        unblocked.unwrap_err(),
        AppError::InvalidTransition(_)
    ));
}
