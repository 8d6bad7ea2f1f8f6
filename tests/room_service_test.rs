//! Room service tests: creation guards, visibility, and the
//! owner/admin split on status changes.

mod common;

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use roomstay::domain::{RoomStatus, UserRole, UserStatus};
use roomstay::errors::AppError;
use roomstay::services::{RoomManager, RoomService, UpdateRoomInput};

use common::{
    admin_caller, test_room, test_user, user_caller, MockBookingRepo, MockRoomRepo, MockUserRepo,
    TestUnitOfWork,
};

fn service(users: MockUserRepo, rooms: MockRoomRepo) -> RoomManager<TestUnitOfWork> {
    RoomManager::new(Arc::new(TestUnitOfWork::new(
        users,
        rooms,
        MockBookingRepo::new(),
    )))
}

#[tokio::test]
async fn create_room_succeeds_for_active_owner() {
    let owner_id = Uuid::new_v4();

    let mut users = MockUserRepo::new();
    users
        .expect_find_by_id()
        .returning(|id| Ok(Some(test_user(id, UserRole::User, UserStatus::Active))));

    let mut rooms = MockRoomRepo::new();
    rooms.expect_create().returning(|new_room| {
        let mut room = test_room(Uuid::new_v4(), new_room.owner_id, RoomStatus::Available);
        room.name = new_room.name;
        room.price_per_day = new_room.price_per_day;
        Ok(room)
    });

    let room = service(users, rooms)
        .create_room(
            &user_caller(owner_id),
            "  Lakeside cabin ".to_string(),
            Decimal::from(120),
        )
        .await
        .unwrap();

    assert_eq!(room.owner_id, owner_id);
    assert_eq!(room.name, "Lakeside cabin");
    assert_eq!(room.status, RoomStatus::Available);
}

#[tokio::test]
async fn create_room_rejects_blocked_owner() {
    let mut users = MockUserRepo::new();
    users
        .expect_find_by_id()
        .returning(|id| Ok(Some(test_user(id, UserRole::User, UserStatus::Blocked))));

    let result = service(users, MockRoomRepo::new())
        .create_room(
            &user_caller(Uuid::new_v4()),
            "Cabin".to_string(),
            Decimal::from(100),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::OwnerNotActive));
}

#[tokio::test]
async fn create_room_validates_name_and_price() {
    let owner_id = Uuid::new_v4();

    let mut users = MockUserRepo::new();
    users
        .expect_find_by_id()
        .returning(|id| Ok(Some(test_user(id, UserRole::User, UserStatus::Active))));

    let service = service(users, MockRoomRepo::new());
    let caller = user_caller(owner_id);

    let empty = service
        .create_room(&caller, "   ".to_string(), Decimal::from(100))
        .await;
    assert!(matches!(empty.unwrap_err(), AppError::EmptyName));

    let negative = service
        .create_room(&caller, "Cabin".to_string(), Decimal::from(-1))
        .await;
    assert!(matches!(negative.unwrap_err(), AppError::NegativePrice));
}

#[tokio::test]
async fn archived_rooms_are_invisible_to_non_admins() {
    let room_id = Uuid::new_v4();

    let mut rooms = MockRoomRepo::new();
    rooms
        .expect_find_by_id()
        .returning(|id| Ok(Some(test_room(id, Uuid::new_v4(), RoomStatus::Archived))));

    let service = service(MockUserRepo::new(), rooms);

    let hidden = service.get_room(&user_caller(Uuid::new_v4()), room_id).await;
    assert!(matches!(hidden.unwrap_err(), AppError::NotFound("Room")));

    let visible = service.get_room(&admin_caller(), room_id).await.unwrap();
    assert_eq!(visible.id, room_id);
}

#[tokio::test]
async fn update_room_requires_owner_or_admin() {
    let mut rooms = MockRoomRepo::new();
    rooms
        .expect_find_by_id()
        .returning(|id| Ok(Some(test_room(id, Uuid::new_v4(), RoomStatus::Available))));

    let result = service(MockUserRepo::new(), rooms)
        .update_room(
            &user_caller(Uuid::new_v4()),
            Uuid::new_v4(),
            UpdateRoomInput::default(),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn blocked_actor_cannot_update_own_room() {
    let owner_id = Uuid::new_v4();

    let mut rooms = MockRoomRepo::new();
    rooms
        .expect_find_by_id()
        .returning(move |id| Ok(Some(test_room(id, owner_id, RoomStatus::Available))));

    let mut actor = user_caller(owner_id);
    actor.status = UserStatus::Blocked;

    let result = service(MockUserRepo::new(), rooms)
        .update_room(&actor, Uuid::new_v4(), UpdateRoomInput::default())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::ActorNotActive));
}

#[tokio::test]
async fn owner_may_toggle_maintenance_but_not_archive() {
    let owner_id = Uuid::new_v4();

    let mut rooms = MockRoomRepo::new();
    rooms
        .expect_find_by_id()
        .returning(move |id| Ok(Some(test_room(id, owner_id, RoomStatus::Available))));
    rooms.expect_save().returning(|room| Ok(room.clone()));

    let service = service(MockUserRepo::new(), rooms);
    let caller = user_caller(owner_id);

    let updated = service
        .update_room(
            &caller,
            Uuid::new_v4(),
            UpdateRoomInput {
                status: Some(RoomStatus::Maintenance),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, RoomStatus::Maintenance);

    let denied = service
        .update_room(
            &caller,
            Uuid::new_v4(),
            UpdateRoomInput {
                status: Some(RoomStatus::Blocked),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(denied.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn archived_room_is_immutable_except_admin_restore() {
    let owner_id = Uuid::new_v4();

    let mut rooms = MockRoomRepo::new();
    rooms
        .expect_find_by_id()
        .returning(move |id| Ok(Some(test_room(id, owner_id, RoomStatus::Archived))));
    rooms.expect_save().returning(|room| Ok(room.clone()));

    let service = service(MockUserRepo::new(), rooms);

    let frozen = service
        .update_room(
            &user_caller(owner_id),
            Uuid::new_v4(),
            UpdateRoomInput {
                name: Some("New name".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(frozen.unwrap_err(), AppError::ArchivedImmutable));

    let restored = service
        .update_room(
            &admin_caller(),
            Uuid::new_v4(),
            UpdateRoomInput {
                status: Some(RoomStatus::Available),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(restored.status, RoomStatus::Available);
}

#[tokio::test]
async fn owner_reassignment_is_admin_only() {
    let owner_id = Uuid::new_v4();

    let mut rooms = MockRoomRepo::new();
    rooms
        .expect_find_by_id()
        .returning(move |id| Ok(Some(test_room(id, owner_id, RoomStatus::Available))));

    let result = service(MockUserRepo::new(), rooms)
        .update_room(
            &user_caller(owner_id),
            Uuid::new_v4(),
            UpdateRoomInput {
                owner_id: Some(Uuid::new_v4()),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn owner_reassignment_checks_new_owner_exists() {
    let mut rooms = MockRoomRepo::new();
    rooms
        .expect_find_by_id()
        .returning(|id| Ok(Some(test_room(id, Uuid::new_v4(), RoomStatus::Available))));

    let mut users = MockUserRepo::new();
    users.expect_find_by_id().returning(|_| Ok(None));

    let result = service(users, rooms)
        .update_room(
            &admin_caller(),
            Uuid::new_v4(),
            UpdateRoomInput {
                owner_id: Some(Uuid::new_v4()),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound("User")));
}

#[tokio::test]
async fn archive_room_is_admin_only() {
    let result = service(MockUserRepo::new(), MockRoomRepo::new())
        .archive_room(&user_caller(Uuid::new_v4()), Uuid::new_v4())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn archive_room_rejects_repeat_archival() {
    let mut rooms = MockRoomRepo::new();
    rooms
        .expect_find_by_id()
        .returning(|id| Ok(Some(test_room(id, Uuid::new_v4(), RoomStatus::Archived))));

    let result = service(MockUserRepo::new(), rooms)
        .archive_room(&admin_caller(), Uuid::new_v4())
        .await;

    assert!(matches!(
        result.unwrap_err(),
        AppError::AlreadyArchived("Room")
    ));
}
