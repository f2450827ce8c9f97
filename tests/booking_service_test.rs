use flight_booking_api::{
    models::booking::{BookingClass, BookingCreateRequest, BookingListFilter, BookingStatus},
    models::user::Role,
    services::booking_service::BookingService,
    utils::error::AppError,
    utils::jwt::AuthenticatedUser,
};
use async_trait::async_trait;
use ctor::dtor;
use sqlx::SqlitePool;
use test_context::{test_context, AsyncTestContext};
use tokio::task::JoinSet;

mod common {
    pub mod test_utils;
}
use common::test_utils::TestDb;

struct BookingServiceContext {
    pool: SqlitePool,
    booking_service: BookingService,
}

#[dtor]
fn cleanup() {
    TestDb::cleanup_database();
}

#[async_trait]
impl AsyncTestContext for BookingServiceContext {
    async fn setup() -> Self {
        let pool = TestDb::get_instance(file!())
            .await
            .expect("Failed to get test database instance");

        let booking_service = BookingService::new(pool.clone());

        BookingServiceContext {
            pool,
            booking_service,
        }
    }

    async fn teardown(self) {
        let _ = sqlx::query("SELECT 1").execute(&self.pool).await;
    }
}

async fn seed_user(pool: &SqlitePool, email: &str) -> Result<i64, AppError> {
    let result =
        sqlx::query("INSERT INTO users (email, password, name) VALUES (?, 'hash', 'Test User')")
            .bind(email)
            .execute(pool)
            .await?;
    Ok(result.last_insert_rowid())
}

async fn seed_flight(
    pool: &SqlitePool,
    flight_number: &str,
    total_seats: i64,
    available_seats: i64,
) -> Result<i64, AppError> {
    let result = sqlx::query(
        r#"
        INSERT INTO flights
            (flight_number, airline, origin, destination, departure_time, arrival_time,
             total_seats, available_seats, price)
        VALUES (?, 'Maple Air', 'YYZ', 'LHR', '2026-06-01 10:00:00', '2026-06-01 22:00:00', ?, ?, 420.0)
        "#,
    )
    .bind(flight_number)
    .bind(total_seats)
    .bind(available_seats)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

async fn seed_passenger(
    pool: &SqlitePool,
    user_id: i64,
    passport_number: &str,
) -> Result<i64, AppError> {
    let result = sqlx::query(
        r#"
        INSERT INTO passengers
            (user_id, first_name, last_name, date_of_birth, passport_number, nationality)
        VALUES (?, 'Ada', 'Lovelace', '1990-01-01', ?, 'Canadian')
        "#,
    )
    .bind(user_id)
    .bind(passport_number)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

async fn available_seats(pool: &SqlitePool, flight_id: i64) -> Result<i64, AppError> {
    let row = sqlx::query_as::<_, (i64,)>("SELECT available_seats FROM flights WHERE id = ?")
        .bind(flight_id)
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

fn passenger_caller(user_id: i64) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id,
        role: Role::Passenger,
    }
}

fn admin_caller(user_id: i64) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id,
        role: Role::Admin,
    }
}

fn booking_request(flight_id: i64, passenger_id: i64) -> BookingCreateRequest {
    BookingCreateRequest {
        flight_id,
        passenger_id,
        seat_number: None,
        booking_class: None,
    }
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_create_booking_decrements_available_seats(
    ctx: &BookingServiceContext,
) -> Result<(), AppError> {
    let user_id = seed_user(&ctx.pool, "create_booking@example.com").await?;
    let flight_id = seed_flight(&ctx.pool, "FB100", 2, 2).await?;
    let passenger_id = seed_passenger(&ctx.pool, user_id, "P-CREATE-1").await?;

    let booking = ctx
        .booking_service
        .create_booking(&passenger_caller(user_id), booking_request(flight_id, passenger_id))
        .await?;

    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(booking.booking_class, BookingClass::Economy);
    assert_eq!(booking.user_id, user_id);
    assert_eq!(booking.flight_number, "FB100");
    assert_eq!(booking.passport_number, "P-CREATE-1");

    assert!(booking.booking_reference.starts_with("BK"));
    assert_eq!(booking.booking_reference.len(), 10);
    assert!(booking.booking_reference[2..]
        .chars()
        .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));

    assert_eq!(available_seats(&ctx.pool, flight_id).await?, 1);

    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_create_booking_missing_flight_or_passenger(
    ctx: &BookingServiceContext,
) -> Result<(), AppError> {
    let user_id = seed_user(&ctx.pool, "missing_refs@example.com").await?;
    let flight_id = seed_flight(&ctx.pool, "FB101", 5, 5).await?;
    let passenger_id = seed_passenger(&ctx.pool, user_id, "P-MISSING-1").await?;

    let missing_flight = ctx
        .booking_service
        .create_booking(&passenger_caller(user_id), booking_request(999_999, passenger_id))
        .await;
    assert!(matches!(missing_flight, Err(AppError::NotFound(_))));

    let missing_passenger = ctx
        .booking_service
        .create_booking(&passenger_caller(user_id), booking_request(flight_id, 999_999))
        .await;
    assert!(matches!(missing_passenger, Err(AppError::NotFound(_))));

    // neither failure may touch the seat count
    assert_eq!(available_seats(&ctx.pool, flight_id).await?, 5);

    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_create_booking_for_other_users_passenger(
    ctx: &BookingServiceContext,
) -> Result<(), AppError> {
    let owner_id = seed_user(&ctx.pool, "passenger_owner@example.com").await?;
    let stranger_id = seed_user(&ctx.pool, "stranger@example.com").await?;
    let admin_id = seed_user(&ctx.pool, "booking_admin@example.com").await?;
    let flight_id = seed_flight(&ctx.pool, "FB102", 5, 5).await?;
    let passenger_id = seed_passenger(&ctx.pool, owner_id, "P-OWNED-1").await?;

    let denied = ctx
        .booking_service
        .create_booking(&passenger_caller(stranger_id), booking_request(flight_id, passenger_id))
        .await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));
    assert_eq!(available_seats(&ctx.pool, flight_id).await?, 5);

    // an admin may book on behalf of any passenger
    let booking = ctx
        .booking_service
        .create_booking(&admin_caller(admin_id), booking_request(flight_id, passenger_id))
        .await?;
    assert_eq!(booking.user_id, admin_id);
    assert_eq!(available_seats(&ctx.pool, flight_id).await?, 4);

    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_create_booking_without_seats(ctx: &BookingServiceContext) -> Result<(), AppError> {
    let user_id = seed_user(&ctx.pool, "no_seats@example.com").await?;
    let flight_id = seed_flight(&ctx.pool, "FB103", 10, 0).await?;
    let passenger_id = seed_passenger(&ctx.pool, user_id, "P-NOSEAT-1").await?;

    let result = ctx
        .booking_service
        .create_booking(&passenger_caller(user_id), booking_request(flight_id, passenger_id))
        .await;
    assert!(matches!(result, Err(AppError::CapacityExceeded(_))));
    assert_eq!(available_seats(&ctx.pool, flight_id).await?, 0);

    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_create_booking_on_cancelled_flight(
    ctx: &BookingServiceContext,
) -> Result<(), AppError> {
    let user_id = seed_user(&ctx.pool, "cancelled_flight@example.com").await?;
    let flight_id = seed_flight(&ctx.pool, "FB104", 5, 5).await?;
    sqlx::query("UPDATE flights SET status = 'cancelled' WHERE id = ?")
        .bind(flight_id)
        .execute(&ctx.pool)
        .await?;
    let passenger_id = seed_passenger(&ctx.pool, user_id, "P-CXLFLT-1").await?;

    let result = ctx
        .booking_service
        .create_booking(&passenger_caller(user_id), booking_request(flight_id, passenger_id))
        .await;
    assert!(matches!(result, Err(AppError::InvalidState(_))));

    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_concurrent_booking_contention(ctx: &BookingServiceContext) -> Result<(), AppError> {
    let capacity: i64 = 3;
    let num_users = 10;
    let flight_id = seed_flight(&ctx.pool, "FB105", capacity, capacity).await?;

    let mut participants = Vec::new();
    for i in 0..num_users {
        let user_id = seed_user(&ctx.pool, &format!("contender_{}@example.com", i)).await?;
        let passenger_id =
            seed_passenger(&ctx.pool, user_id, &format!("P-CONTEND-{}", i)).await?;
        participants.push((user_id, passenger_id));
    }

    let mut join_set = JoinSet::new();
    for (user_id, passenger_id) in participants {
        let booking_service = ctx.booking_service.clone();
        join_set.spawn(async move {
            booking_service
                .create_booking(
                    &passenger_caller(user_id),
                    booking_request(flight_id, passenger_id),
                )
                .await
        });
    }

    let mut successes = 0;
    let mut capacity_failures = 0;
    while let Some(result) = join_set.join_next().await {
        match result.unwrap() {
            Ok(_) => successes += 1,
            Err(AppError::CapacityExceeded(_)) => capacity_failures += 1,
            Err(e) => panic!("unexpected booking failure: {}", e),
        }
    }

    assert_eq!(successes, capacity, "exactly {} bookings should succeed", capacity);
    assert_eq!(capacity_failures, num_users - capacity);

    let booked = sqlx::query_as::<_, (i64,)>(
        "SELECT COUNT(*) FROM bookings WHERE flight_id = ? AND status = 'confirmed'",
    )
    .bind(flight_id)
    .fetch_one(&ctx.pool)
    .await?;
    assert_eq!(booked.0, capacity);

    let remaining = available_seats(&ctx.pool, flight_id).await?;
    assert_eq!(remaining, 0, "seat count must never go negative");

    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_capacity_one_book_deny_cancel(ctx: &BookingServiceContext) -> Result<(), AppError> {
    let user_a = seed_user(&ctx.pool, "capacity_a@example.com").await?;
    let user_b = seed_user(&ctx.pool, "capacity_b@example.com").await?;
    let flight_id = seed_flight(&ctx.pool, "FB106", 1, 1).await?;
    let passenger_a = seed_passenger(&ctx.pool, user_a, "P-CAP-A").await?;
    let passenger_b = seed_passenger(&ctx.pool, user_b, "P-CAP-B").await?;

    let booking_a = ctx
        .booking_service
        .create_booking(&passenger_caller(user_a), booking_request(flight_id, passenger_a))
        .await?;
    assert_eq!(available_seats(&ctx.pool, flight_id).await?, 0);

    let booking_b = ctx
        .booking_service
        .create_booking(&passenger_caller(user_b), booking_request(flight_id, passenger_b))
        .await;
    assert!(matches!(booking_b, Err(AppError::CapacityExceeded(_))));

    let cancelled = ctx
        .booking_service
        .cancel_booking(&passenger_caller(user_a), booking_a.id)
        .await?;
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert_eq!(available_seats(&ctx.pool, flight_id).await?, 1);

    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_cancel_twice_is_rejected(ctx: &BookingServiceContext) -> Result<(), AppError> {
    let user_id = seed_user(&ctx.pool, "double_cancel@example.com").await?;
    let flight_id = seed_flight(&ctx.pool, "FB107", 4, 4).await?;
    let passenger_id = seed_passenger(&ctx.pool, user_id, "P-DBLCXL-1").await?;

    let booking = ctx
        .booking_service
        .create_booking(&passenger_caller(user_id), booking_request(flight_id, passenger_id))
        .await?;

    ctx.booking_service
        .cancel_booking(&passenger_caller(user_id), booking.id)
        .await?;
    assert_eq!(available_seats(&ctx.pool, flight_id).await?, 4);

    let second = ctx
        .booking_service
        .cancel_booking(&passenger_caller(user_id), booking.id)
        .await;
    assert!(matches!(second, Err(AppError::InvalidState(_))));

    // the failed second cancel must not restore another seat
    assert_eq!(available_seats(&ctx.pool, flight_id).await?, 4);

    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_cancel_requires_ownership(ctx: &BookingServiceContext) -> Result<(), AppError> {
    let owner_id = seed_user(&ctx.pool, "cancel_owner@example.com").await?;
    let stranger_id = seed_user(&ctx.pool, "cancel_stranger@example.com").await?;
    let admin_id = seed_user(&ctx.pool, "cancel_admin@example.com").await?;
    let flight_id = seed_flight(&ctx.pool, "FB108", 4, 4).await?;
    let passenger_id = seed_passenger(&ctx.pool, owner_id, "P-CXLOWN-1").await?;

    let booking = ctx
        .booking_service
        .create_booking(&passenger_caller(owner_id), booking_request(flight_id, passenger_id))
        .await?;

    let denied = ctx
        .booking_service
        .cancel_booking(&passenger_caller(stranger_id), booking.id)
        .await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    let cancelled = ctx
        .booking_service
        .cancel_booking(&admin_caller(admin_id), booking.id)
        .await?;
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_delete_restores_seat_only_for_confirmed(
    ctx: &BookingServiceContext,
) -> Result<(), AppError> {
    let user_id = seed_user(&ctx.pool, "delete_booking@example.com").await?;
    let flight_id = seed_flight(&ctx.pool, "FB109", 4, 4).await?;
    let passenger_id = seed_passenger(&ctx.pool, user_id, "P-DEL-1").await?;

    let confirmed = ctx
        .booking_service
        .create_booking(&passenger_caller(user_id), booking_request(flight_id, passenger_id))
        .await?;
    let cancelled = ctx
        .booking_service
        .create_booking(&passenger_caller(user_id), booking_request(flight_id, passenger_id))
        .await?;
    ctx.booking_service
        .cancel_booking(&passenger_caller(user_id), cancelled.id)
        .await?;
    assert_eq!(available_seats(&ctx.pool, flight_id).await?, 3);

    // deleting a confirmed booking hands its seat back
    ctx.booking_service.delete_booking(confirmed.id).await?;
    assert_eq!(available_seats(&ctx.pool, flight_id).await?, 4);

    // deleting a cancelled booking must not touch the counter again
    ctx.booking_service.delete_booking(cancelled.id).await?;
    assert_eq!(available_seats(&ctx.pool, flight_id).await?, 4);

    let missing = ctx.booking_service.delete_booking(cancelled.id).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_booking_references_are_unique(ctx: &BookingServiceContext) -> Result<(), AppError> {
    let user_id = seed_user(&ctx.pool, "references@example.com").await?;
    let flight_id = seed_flight(&ctx.pool, "FB110", 8, 8).await?;
    let passenger_id = seed_passenger(&ctx.pool, user_id, "P-REF-1").await?;

    let mut references = Vec::new();
    for _ in 0..5 {
        let booking = ctx
            .booking_service
            .create_booking(&passenger_caller(user_id), booking_request(flight_id, passenger_id))
            .await?;
        references.push(booking.booking_reference);
    }

    let mut deduped = references.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), references.len());

    for reference in &references {
        assert!(reference.starts_with("BK"));
        assert_eq!(reference.len(), 10);
    }

    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_get_booking_by_reference(ctx: &BookingServiceContext) -> Result<(), AppError> {
    let user_id = seed_user(&ctx.pool, "by_reference@example.com").await?;
    let stranger_id = seed_user(&ctx.pool, "by_reference_stranger@example.com").await?;
    let flight_id = seed_flight(&ctx.pool, "FB111", 4, 4).await?;
    let passenger_id = seed_passenger(&ctx.pool, user_id, "P-BYREF-1").await?;

    let booking = ctx
        .booking_service
        .create_booking(&passenger_caller(user_id), booking_request(flight_id, passenger_id))
        .await?;

    let fetched = ctx
        .booking_service
        .get_booking_by_reference(&passenger_caller(user_id), &booking.booking_reference)
        .await?;
    assert_eq!(fetched.id, booking.id);

    let denied = ctx
        .booking_service
        .get_booking_by_reference(&passenger_caller(stranger_id), &booking.booking_reference)
        .await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    let unknown = ctx
        .booking_service
        .get_booking_by_reference(&passenger_caller(user_id), "BK00000000")
        .await;
    assert!(matches!(unknown, Err(AppError::NotFound(_))));

    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_list_own_bookings_with_status_filter(
    ctx: &BookingServiceContext,
) -> Result<(), AppError> {
    let user_id = seed_user(&ctx.pool, "listing@example.com").await?;
    let other_id = seed_user(&ctx.pool, "listing_other@example.com").await?;
    let flight_id = seed_flight(&ctx.pool, "FB112", 10, 10).await?;
    let passenger_id = seed_passenger(&ctx.pool, user_id, "P-LIST-1").await?;
    let other_passenger = seed_passenger(&ctx.pool, other_id, "P-LIST-2").await?;

    for _ in 0..3 {
        ctx.booking_service
            .create_booking(&passenger_caller(user_id), booking_request(flight_id, passenger_id))
            .await?;
    }
    let to_cancel = ctx
        .booking_service
        .create_booking(&passenger_caller(user_id), booking_request(flight_id, passenger_id))
        .await?;
    ctx.booking_service
        .cancel_booking(&passenger_caller(user_id), to_cancel.id)
        .await?;
    // someone else's booking must never appear in the listing
    ctx.booking_service
        .create_booking(&passenger_caller(other_id), booking_request(flight_id, other_passenger))
        .await?;

    let all = ctx
        .booking_service
        .find_by_user(user_id, BookingListFilter::default())
        .await?;
    assert_eq!(all.len(), 4);
    assert!(all.iter().all(|b| b.user_id == user_id));

    let confirmed = ctx
        .booking_service
        .find_by_user(
            user_id,
            BookingListFilter {
                status: Some(BookingStatus::Confirmed),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(confirmed.len(), 3);

    let paged = ctx
        .booking_service
        .find_by_user(
            user_id,
            BookingListFilter {
                status: None,
                limit: Some(2),
                offset: Some(0),
            },
        )
        .await?;
    assert_eq!(paged.len(), 2);

    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_get_booking_enforces_ownership(ctx: &BookingServiceContext) -> Result<(), AppError> {
    let owner_id = seed_user(&ctx.pool, "get_owner@example.com").await?;
    let stranger_id = seed_user(&ctx.pool, "get_stranger@example.com").await?;
    let admin_id = seed_user(&ctx.pool, "get_admin@example.com").await?;
    let flight_id = seed_flight(&ctx.pool, "FB113", 4, 4).await?;
    let passenger_id = seed_passenger(&ctx.pool, owner_id, "P-GET-1").await?;

    let booking = ctx
        .booking_service
        .create_booking(&passenger_caller(owner_id), booking_request(flight_id, passenger_id))
        .await?;

    let denied = ctx
        .booking_service
        .get_booking(&passenger_caller(stranger_id), booking.id)
        .await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    let as_admin = ctx
        .booking_service
        .get_booking(&admin_caller(admin_id), booking.id)
        .await?;
    assert_eq!(as_admin.id, booking.id);

    Ok(())
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_admin_flight_bookings_listing(ctx: &BookingServiceContext) -> Result<(), AppError> {
    let user_id = seed_user(&ctx.pool, "flight_listing@example.com").await?;
    let flight_id = seed_flight(&ctx.pool, "FB114", 5, 5).await?;
    let other_flight = seed_flight(&ctx.pool, "FB115", 5, 5).await?;
    let passenger_id = seed_passenger(&ctx.pool, user_id, "P-FLIST-1").await?;

    ctx.booking_service
        .create_booking(&passenger_caller(user_id), booking_request(flight_id, passenger_id))
        .await?;
    ctx.booking_service
        .create_booking(&passenger_caller(user_id), booking_request(other_flight, passenger_id))
        .await?;

    let bookings = ctx.booking_service.find_by_flight(flight_id).await?;
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].flight_id, flight_id);

    let missing = ctx.booking_service.find_by_flight(999_999).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    Ok(())
}
