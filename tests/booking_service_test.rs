//! Booking service tests: admission prefix checks, visibility, and the
//! cancel/confirm state machine. The overlap probe and insert run inside
//! a serializable transaction and are covered by the domain rule tests.

mod common;

use std::sync::Arc;

use mockall::predicate::eq;
use uuid::Uuid;

use roomstay::domain::{BookingStatus, UserRole, UserStatus};
use roomstay::errors::AppError;
use roomstay::services::{BookingManager, BookingService};

use common::{
    admin_caller, date, test_booking, test_user, user_caller, MockBookingRepo, MockRoomRepo,
    MockUserRepo, TestUnitOfWork,
};

fn service(users: MockUserRepo, bookings: MockBookingRepo) -> BookingManager<TestUnitOfWork> {
    BookingManager::new(Arc::new(TestUnitOfWork::new(
        users,
        MockRoomRepo::new(),
        bookings,
    )))
}

fn active_users() -> MockUserRepo {
    let mut users = MockUserRepo::new();
    users
        .expect_find_by_id()
        .returning(|id| Ok(Some(test_user(id, UserRole::User, UserStatus::Active))));
    users
}

#[tokio::test]
async fn create_booking_requires_known_requester() {
    let mut users = MockUserRepo::new();
    users.expect_find_by_id().returning(|_| Ok(None));

    let result = service(users, MockBookingRepo::new())
        .create_booking(
            &user_caller(Uuid::new_v4()),
            vec![Uuid::new_v4()],
            date(2024, 6, 1),
            date(2024, 6, 4),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound("User")));
}

#[tokio::test]
async fn create_booking_requires_active_requester() {
    let mut users = MockUserRepo::new();
    users
        .expect_find_by_id()
        .returning(|id| Ok(Some(test_user(id, UserRole::User, UserStatus::Blocked))));

    let result = service(users, MockBookingRepo::new())
        .create_booking(
            &user_caller(Uuid::new_v4()),
            vec![Uuid::new_v4()],
            date(2024, 6, 1),
            date(2024, 6, 4),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::RequesterNotActive));
}

#[tokio::test]
async fn create_booking_rejects_empty_room_set() {
    let result = service(active_users(), MockBookingRepo::new())
        .create_booking(
            &user_caller(Uuid::new_v4()),
            vec![],
            date(2024, 6, 1),
            date(2024, 6, 4),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::EmptyRoomSet));
}

#[tokio::test]
async fn create_booking_rejects_empty_and_inverted_ranges() {
    let service = service(active_users(), MockBookingRepo::new());
    let caller = user_caller(Uuid::new_v4());
    let rooms = vec![Uuid::new_v4()];

    let same_day = service
        .create_booking(&caller, rooms.clone(), date(2024, 6, 1), date(2024, 6, 1))
        .await;
    assert!(matches!(same_day.unwrap_err(), AppError::InvalidRange));

    let inverted = service
        .create_booking(&caller, rooms, date(2024, 6, 4), date(2024, 6, 1))
        .await;
    assert!(matches!(inverted.unwrap_err(), AppError::InvalidRange));
}

#[tokio::test]
async fn get_booking_hides_other_users_bookings() {
    let requester_id = Uuid::new_v4();
    let booking_id = Uuid::new_v4();

    let mut bookings = MockBookingRepo::new();
    bookings
        .expect_find_by_id()
        .returning(move |id| Ok(Some(test_booking(id, requester_id, BookingStatus::Pending))));

    let service = service(MockUserRepo::new(), bookings);

    let hidden = service
        .get_booking(&user_caller(Uuid::new_v4()), booking_id)
        .await;
    assert!(matches!(hidden.unwrap_err(), AppError::NotFound("Booking")));

    let own = service
        .get_booking(&user_caller(requester_id), booking_id)
        .await
        .unwrap();
    assert_eq!(own.id, booking_id);

    let admin_view = service.get_booking(&admin_caller(), booking_id).await;
    assert!(admin_view.is_ok());
}

#[tokio::test]
async fn list_bookings_scopes_by_role() {
    let requester_id = Uuid::new_v4();

    let mut bookings = MockBookingRepo::new();
    bookings.expect_list_all().times(1).returning(|| {
        Ok(vec![
            test_booking(Uuid::new_v4(), Uuid::new_v4(), BookingStatus::Pending),
            test_booking(Uuid::new_v4(), Uuid::new_v4(), BookingStatus::Confirmed),
        ])
    });
    bookings
        .expect_list_by_requester()
        .with(eq(requester_id))
        .times(1)
        .returning(|user_id| {
            Ok(vec![test_booking(
                Uuid::new_v4(),
                user_id,
                BookingStatus::Pending,
            )])
        });

    let service = service(MockUserRepo::new(), bookings);

    let all = service.list_bookings(&admin_caller()).await.unwrap();
    assert_eq!(all.len(), 2);

    let own = service
        .list_bookings(&user_caller(requester_id))
        .await
        .unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].user_id, requester_id);
}

#[tokio::test]
async fn requester_can_cancel_own_booking() {
    let requester_id = Uuid::new_v4();
    let booking_id = Uuid::new_v4();

    let mut bookings = MockBookingRepo::new();
    bookings
        .expect_find_by_id()
        .returning(move |id| Ok(Some(test_booking(id, requester_id, BookingStatus::Confirmed))));
    bookings
        .expect_set_status()
        .with(eq(booking_id), eq(BookingStatus::Cancelled))
        .times(1)
        .returning(|_, _| Ok(()));

    let cancelled = service(MockUserRepo::new(), bookings)
        .cancel_booking(&user_caller(requester_id), booking_id)
        .await
        .unwrap();

    assert_eq!(cancelled.status, BookingStatus::Cancelled);
}

#[tokio::test]
async fn cancel_requires_admin_or_requester() {
    let mut bookings = MockBookingRepo::new();
    bookings
        .expect_find_by_id()
        .returning(|id| Ok(Some(test_booking(id, Uuid::new_v4(), BookingStatus::Pending))));

    let result = service(MockUserRepo::new(), bookings)
        .cancel_booking(&user_caller(Uuid::new_v4()), Uuid::new_v4())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn cancelling_twice_is_a_silent_no_op() {
    let requester_id = Uuid::new_v4();

    let mut bookings = MockBookingRepo::new();
    bookings
        .expect_find_by_id()
        .returning(move |id| Ok(Some(test_booking(id, requester_id, BookingStatus::Cancelled))));
    // No write happens for an already-cancelled booking
    bookings.expect_set_status().times(0);

    let result = service(MockUserRepo::new(), bookings)
        .cancel_booking(&user_caller(requester_id), Uuid::new_v4())
        .await
        .unwrap();

    assert_eq!(result.status, BookingStatus::Cancelled);
}

#[tokio::test]
async fn completed_bookings_cannot_be_cancelled() {
    let requester_id = Uuid::new_v4();

    let mut bookings = MockBookingRepo::new();
    bookings
        .expect_find_by_id()
        .returning(move |id| Ok(Some(test_booking(id, requester_id, BookingStatus::Completed))));

    let result = service(MockUserRepo::new(), bookings)
        .cancel_booking(&user_caller(requester_id), Uuid::new_v4())
        .await;

    assert!(matches!(
        result.unwrap_err(),
        AppError::InvalidTransition(_)
    ));
}

#[tokio::test]
async fn confirm_is_admin_only_and_requires_pending() {
    let booking_id = Uuid::new_v4();

    let mut bookings = MockBookingRepo::new();
    bookings.expect_find_by_id().returning(move |id| {
        if id == booking_id {
            Ok(Some(test_booking(id, Uuid::new_v4(), BookingStatus::Pending)))
        } else {
            Ok(Some(test_booking(
                id,
                Uuid::new_v4(),
                BookingStatus::Confirmed,
            )))
        }
    });
    bookings
        .expect_set_status()
        .with(eq(booking_id), eq(BookingStatus::Confirmed))
        .times(1)
        .returning(|_, _| Ok(()));

    let service = service(MockUserRepo::new(), bookings);

    let denied = service
        .confirm_booking(&user_caller(Uuid::new_v4()), booking_id)
        .await;
    assert!(matches!(denied.unwrap_err(), AppError::Forbidden));

    let confirmed = service
        .confirm_booking(&admin_caller(), booking_id)
        .await
        .unwrap();
    assert_eq!(confirmed.status, BookingStatus::Confirmed);

    // Confirming twice fails
    let repeat = service.confirm_booking(&admin_caller(), Uuid::new_v4()).await;
    assert!(matches!(
        repeat.unwrap_err(),
        AppError::InvalidTransition(_)
    ));
}
