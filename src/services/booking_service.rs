use crate::models::booking::{
    Booking, BookingClass, BookingCreateRequest, BookingDetail, BookingListFilter, BookingStatus,
};
use crate::models::passenger::Passenger;
use crate::models::response::DEFAULT_PAGE_SIZE;
use crate::services::flight_service::FlightService;
use crate::utils::error::{AppError, AppResult};
use crate::utils::jwt::AuthenticatedUser;
use crate::utils::policy;
use rand::Rng;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use validator::Validate;

const BOOKING_REFERENCE_PREFIX: &str = "BK";
const MAX_REFERENCE_RETRIES: u32 = 3;

const BOOKING_DETAIL_SELECT: &str = r#"
    SELECT
        b.id, b.booking_reference, b.user_id, b.flight_id, b.passenger_id,
        b.seat_number, b.booking_class, b.status, b.created_at, b.updated_at,
        u.name AS user_name, u.email AS user_email,
        f.flight_number, f.airline, f.origin, f.destination,
        f.departure_time, f.arrival_time, f.price,
        p.first_name, p.last_name, p.passport_number
    FROM bookings b
    JOIN users u ON b.user_id = u.id
    JOIN flights f ON b.flight_id = f.id
    JOIN passengers p ON b.passenger_id = p.id
"#;

#[derive(Clone)]
pub struct BookingService {
    pool: SqlitePool,
    flight_service: FlightService,
}

impl BookingService {
    pub fn new(pool: SqlitePool) -> Self {
        BookingService {
            flight_service: FlightService::new(pool.clone()),
            pool,
        }
    }

    fn generate_booking_reference() -> String {
        format!(
            "{}{:08X}",
            BOOKING_REFERENCE_PREFIX,
            rand::thread_rng().gen::<u32>()
        )
    }

    /// Create a booking for one of the caller's passengers (or any passenger,
    /// for an admin). The seat decrement and the booking insert commit in a
    /// single transaction; the decrement is conditional on seats remaining.
    pub async fn create_booking(
        &self,
        caller: &AuthenticatedUser,
        request: BookingCreateRequest,
    ) -> AppResult<BookingDetail> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let flight = self
            .flight_service
            .find_by_id(request.flight_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Flight not found".into()))?;

        if !flight.status.is_bookable() {
            return Err(AppError::InvalidState(
                "Flight is not open for booking".into(),
            ));
        }
        if flight.available_seats <= 0 {
            return Err(AppError::CapacityExceeded(
                "No available seats on this flight".into(),
            ));
        }

        let passenger =
            sqlx::query_as::<_, Passenger>("SELECT * FROM passengers WHERE id = ?")
                .bind(request.passenger_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("Passenger not found".into()))?;

        if !policy::can_access(caller.user_id, caller.role, passenger.user_id) {
            return Err(AppError::Forbidden(
                "Not authorized to book for this passenger".into(),
            ));
        }

        let booking_class = request.booking_class.unwrap_or(BookingClass::Economy);

        let mut tx = self.pool.begin().await?;

        // Take the seat first; losing the race here surfaces as CapacityExceeded
        // and rolls the whole transaction back.
        self.flight_service
            .adjust_available_seats(&mut tx, request.flight_id, -1)
            .await?;

        let mut attempts = 0;
        let booking_id = loop {
            let reference = Self::generate_booking_reference();
            let inserted = sqlx::query(
                r#"
                INSERT INTO bookings
                    (booking_reference, user_id, flight_id, passenger_id,
                     seat_number, booking_class, status)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&reference)
            .bind(caller.user_id)
            .bind(request.flight_id)
            .bind(request.passenger_id)
            .bind(&request.seat_number)
            .bind(booking_class)
            .bind(BookingStatus::Confirmed)
            .execute(&mut *tx)
            .await;

            match inserted {
                Ok(result) => break result.last_insert_rowid(),
                Err(sqlx::Error::Database(e))
                    if e.message().contains("bookings.booking_reference")
                        && attempts < MAX_REFERENCE_RETRIES =>
                {
                    log::warn!("booking reference collision, retrying");
                    attempts += 1;
                }
                Err(e) => return Err(e.into()),
            }
        };

        tx.commit().await?;

        self.find_detail_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))
    }

    pub async fn find_detail_by_id(&self, booking_id: i64) -> AppResult<Option<BookingDetail>> {
        Ok(sqlx::query_as::<_, BookingDetail>(&format!(
            "{} WHERE b.id = ?",
            BOOKING_DETAIL_SELECT
        ))
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    pub async fn get_booking(
        &self,
        caller: &AuthenticatedUser,
        booking_id: i64,
    ) -> AppResult<BookingDetail> {
        let booking = self
            .find_detail_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        if !policy::can_access(caller.user_id, caller.role, booking.user_id) {
            return Err(AppError::Forbidden(
                "Not authorized to view this booking".into(),
            ));
        }

        Ok(booking)
    }

    pub async fn get_booking_by_reference(
        &self,
        caller: &AuthenticatedUser,
        reference: &str,
    ) -> AppResult<BookingDetail> {
        let booking = sqlx::query_as::<_, BookingDetail>(&format!(
            "{} WHERE b.booking_reference = ?",
            BOOKING_DETAIL_SELECT
        ))
        .bind(reference)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        if !policy::can_access(caller.user_id, caller.role, booking.user_id) {
            return Err(AppError::Forbidden(
                "Not authorized to view this booking".into(),
            ));
        }

        Ok(booking)
    }

    pub async fn find_by_user(
        &self,
        user_id: i64,
        filter: BookingListFilter,
    ) -> AppResult<Vec<BookingDetail>> {
        let mut builder = QueryBuilder::<Sqlite>::new(BOOKING_DETAIL_SELECT);
        builder.push(" WHERE b.user_id = ").push_bind(user_id);
        if let Some(status) = filter.status {
            builder.push(" AND b.status = ").push_bind(status);
        }
        builder
            .push(" ORDER BY b.created_at DESC LIMIT ")
            .push_bind(filter.limit.unwrap_or(DEFAULT_PAGE_SIZE))
            .push(" OFFSET ")
            .push_bind(filter.offset.unwrap_or(0));

        Ok(builder
            .build_query_as::<BookingDetail>()
            .fetch_all(&self.pool)
            .await?)
    }

    // Admin listing over every user's bookings
    pub async fn find_all(&self, filter: BookingListFilter) -> AppResult<Vec<BookingDetail>> {
        let mut builder = QueryBuilder::<Sqlite>::new(BOOKING_DETAIL_SELECT);
        if let Some(status) = filter.status {
            builder.push(" WHERE b.status = ").push_bind(status);
        }
        builder
            .push(" ORDER BY b.created_at DESC LIMIT ")
            .push_bind(filter.limit.unwrap_or(DEFAULT_PAGE_SIZE))
            .push(" OFFSET ")
            .push_bind(filter.offset.unwrap_or(0));

        Ok(builder
            .build_query_as::<BookingDetail>()
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn find_by_flight(&self, flight_id: i64) -> AppResult<Vec<BookingDetail>> {
        if self.flight_service.find_by_id(flight_id).await?.is_none() {
            return Err(AppError::NotFound("Flight not found".into()));
        }

        Ok(sqlx::query_as::<_, BookingDetail>(&format!(
            "{} WHERE b.flight_id = ? ORDER BY b.created_at DESC",
            BOOKING_DETAIL_SELECT
        ))
        .bind(flight_id)
        .fetch_all(&self.pool)
        .await?)
    }

    /// confirmed -> cancelled; restores the seat in the same transaction.
    pub async fn cancel_booking(
        &self,
        caller: &AuthenticatedUser,
        booking_id: i64,
    ) -> AppResult<BookingDetail> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        if !policy::can_access(caller.user_id, caller.role, booking.user_id) {
            return Err(AppError::Forbidden(
                "Not authorized to cancel this booking".into(),
            ));
        }

        match booking.status {
            BookingStatus::Cancelled => {
                return Err(AppError::InvalidState("Booking is already cancelled".into()))
            }
            BookingStatus::Completed => {
                return Err(AppError::InvalidState(
                    "Completed bookings cannot be cancelled".into(),
                ))
            }
            BookingStatus::Confirmed => {}
        }

        let mut tx = self.pool.begin().await?;

        // Conditional flip so a concurrent cancel cannot restore the seat twice
        let updated = sqlx::query(
            "UPDATE bookings SET status = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ? AND status = ?",
        )
        .bind(BookingStatus::Cancelled)
        .bind(booking_id)
        .bind(BookingStatus::Confirmed)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::InvalidState("Booking is already cancelled".into()));
        }

        self.flight_service
            .adjust_available_seats(&mut tx, booking.flight_id, 1)
            .await?;

        tx.commit().await?;

        self.find_detail_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))
    }

    /// Hard removal. A confirmed booking gives its seat back; a cancelled one
    /// already did.
    pub async fn delete_booking(&self, booking_id: i64) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query_as::<_, (BookingStatus, i64)>(
            "DELETE FROM bookings WHERE id = ? RETURNING status, flight_id",
        )
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        let (status, flight_id) = removed;
        if status == BookingStatus::Confirmed {
            self.flight_service
                .adjust_available_seats(&mut tx, flight_id, 1)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
