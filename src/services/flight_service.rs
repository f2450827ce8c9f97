use crate::models::flight::{
    Flight, FlightCreateRequest, FlightSearchQuery, FlightStatus, FlightUpdateRequest,
};
use crate::models::response::DEFAULT_PAGE_SIZE;
use crate::utils::error::{AppError, AppResult};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use validator::Validate;

#[derive(Clone)]
pub struct FlightService {
    pool: SqlitePool,
}

impl FlightService {
    pub fn new(pool: SqlitePool) -> Self {
        FlightService { pool }
    }

    pub async fn find_all(
        &self,
        status: Option<FlightStatus>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> AppResult<Vec<Flight>> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM flights");
        if let Some(status) = status {
            builder.push(" WHERE status = ").push_bind(status);
        }
        builder
            .push(" ORDER BY departure_time ASC LIMIT ")
            .push_bind(limit.unwrap_or(DEFAULT_PAGE_SIZE))
            .push(" OFFSET ")
            .push_bind(offset.unwrap_or(0));

        Ok(builder
            .build_query_as::<Flight>()
            .fetch_all(&self.pool)
            .await?)
    }

    // Search flights: every provided filter narrows the result, strings match
    // case-insensitively and dates match the calendar day of departure.
    pub async fn search(&self, query: FlightSearchQuery) -> AppResult<Vec<Flight>> {
        let status = query.status.unwrap_or(FlightStatus::Scheduled);

        let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM flights WHERE status = ");
        builder.push_bind(status);
        builder
            .push(" AND LOWER(origin) = LOWER(")
            .push_bind(query.origin)
            .push(")");
        builder
            .push(" AND LOWER(destination) = LOWER(")
            .push_bind(query.destination)
            .push(")");
        if let Some(departure_date) = query.departure_date {
            builder
                .push(" AND DATE(departure_time) = ")
                .push_bind(departure_date);
        }
        if let Some(airline) = query.airline {
            builder
                .push(" AND LOWER(airline) = LOWER(")
                .push_bind(airline)
                .push(")");
        }
        builder
            .push(" ORDER BY departure_time ASC LIMIT ")
            .push_bind(query.limit.unwrap_or(DEFAULT_PAGE_SIZE))
            .push(" OFFSET ")
            .push_bind(query.offset.unwrap_or(0));

        Ok(builder
            .build_query_as::<Flight>()
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn find_by_id(&self, flight_id: i64) -> AppResult<Option<Flight>> {
        Ok(sqlx::query_as::<_, Flight>("SELECT * FROM flights WHERE id = ?")
            .bind(flight_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn find_by_flight_number(&self, flight_number: &str) -> AppResult<Option<Flight>> {
        Ok(
            sqlx::query_as::<_, Flight>("SELECT * FROM flights WHERE flight_number = ?")
                .bind(flight_number)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    pub async fn create_flight(&self, request: FlightCreateRequest) -> AppResult<Flight> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        if self
            .find_by_flight_number(&request.flight_number)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Flight with this flight number already exists".into(),
            ));
        }

        let available_seats = request.available_seats.unwrap_or(request.total_seats);
        if available_seats < 0 || available_seats > request.total_seats {
            return Err(AppError::ValidationError(
                "available_seats must be between 0 and total_seats".into(),
            ));
        }
        let status = request.status.unwrap_or(FlightStatus::Scheduled);

        let result = sqlx::query(
            r#"
            INSERT INTO flights
                (flight_number, airline, origin, destination, departure_time, arrival_time,
                 total_seats, available_seats, price, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&request.flight_number)
        .bind(&request.airline)
        .bind(&request.origin)
        .bind(&request.destination)
        .bind(request.departure_time)
        .bind(request.arrival_time)
        .bind(request.total_seats)
        .bind(available_seats)
        .bind(request.price)
        .bind(status)
        .execute(&self.pool)
        .await?;

        self.find_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| AppError::NotFound("Flight not found".into()))
    }

    pub async fn update_flight(
        &self,
        flight_id: i64,
        request: FlightUpdateRequest,
    ) -> AppResult<Flight> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        if request.available_seats < 0 || request.available_seats > request.total_seats {
            return Err(AppError::ValidationError(
                "available_seats must be between 0 and total_seats".into(),
            ));
        }

        if self.find_by_id(flight_id).await?.is_none() {
            return Err(AppError::NotFound("Flight not found".into()));
        }

        sqlx::query(
            r#"
            UPDATE flights
            SET flight_number = ?,
                airline = ?,
                origin = ?,
                destination = ?,
                departure_time = ?,
                arrival_time = ?,
                total_seats = ?,
                available_seats = ?,
                price = ?,
                status = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
        )
        .bind(&request.flight_number)
        .bind(&request.airline)
        .bind(&request.origin)
        .bind(&request.destination)
        .bind(request.departure_time)
        .bind(request.arrival_time)
        .bind(request.total_seats)
        .bind(request.available_seats)
        .bind(request.price)
        .bind(request.status)
        .bind(flight_id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(flight_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Flight not found".into()))
    }

    pub async fn delete_flight(&self, flight_id: i64) -> AppResult<()> {
        if self.find_by_id(flight_id).await?.is_none() {
            return Err(AppError::NotFound("Flight not found".into()));
        }

        sqlx::query("DELETE FROM flights WHERE id = ?")
            .bind(flight_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Atomically add `delta` seats (positive or negative) to a flight.
    ///
    /// The guard lives in the UPDATE itself so two concurrent decrements can
    /// never both observe the last seat; callers pass the connection or
    /// transaction the adjustment must be part of.
    pub async fn adjust_available_seats(
        &self,
        conn: &mut SqliteConnection,
        flight_id: i64,
        delta: i64,
    ) -> AppResult<Flight> {
        let updated = sqlx::query_as::<_, Flight>(
            r#"
            UPDATE flights
            SET available_seats = available_seats + ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ? AND available_seats + ? BETWEEN 0 AND total_seats
            RETURNING *
            "#,
        )
        .bind(delta)
        .bind(flight_id)
        .bind(delta)
        .fetch_optional(&mut *conn)
        .await?;

        match updated {
            Some(flight) => Ok(flight),
            None => {
                let exists = sqlx::query("SELECT id FROM flights WHERE id = ?")
                    .bind(flight_id)
                    .fetch_optional(&mut *conn)
                    .await?
                    .is_some();

                if !exists {
                    Err(AppError::NotFound("Flight not found".into()))
                } else if delta < 0 {
                    Err(AppError::CapacityExceeded(
                        "No available seats on this flight".into(),
                    ))
                } else {
                    Err(AppError::InvalidState(
                        "Seat count cannot exceed flight capacity".into(),
                    ))
                }
            }
        }
    }

    pub async fn get_availability(&self, flight_id: i64) -> AppResult<i64> {
        let row = sqlx::query_as::<_, (i64,)>(
            "SELECT available_seats FROM flights WHERE id = ?",
        )
        .bind(flight_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Flight not found".into()))?;

        Ok(row.0)
    }
}
