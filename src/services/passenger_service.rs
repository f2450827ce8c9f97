use crate::models::passenger::{
    Passenger, PassengerCreateRequest, PassengerDetail, PassengerUpdateRequest,
};
use crate::models::response::DEFAULT_PAGE_SIZE;
use crate::utils::error::{AppError, AppResult};
use crate::utils::jwt::AuthenticatedUser;
use crate::utils::policy;
use sqlx::SqlitePool;
use validator::Validate;

#[derive(Clone)]
pub struct PassengerService {
    pool: SqlitePool,
}

impl PassengerService {
    pub fn new(pool: SqlitePool) -> Self {
        PassengerService { pool }
    }

    pub async fn create_passenger(
        &self,
        caller: &AuthenticatedUser,
        request: PassengerCreateRequest,
    ) -> AppResult<Passenger> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let existing = sqlx::query("SELECT id FROM passengers WHERE passport_number = ?")
            .bind(&request.passport_number)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(
                "Passenger with this passport number already exists".into(),
            ));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO passengers
                (user_id, first_name, last_name, date_of_birth,
                 passport_number, nationality, email, phone)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(caller.user_id)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(request.date_of_birth)
        .bind(&request.passport_number)
        .bind(&request.nationality)
        .bind(&request.email)
        .bind(&request.phone)
        .execute(&self.pool)
        .await?;

        self.find_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| AppError::NotFound("Passenger not found".into()))
    }

    pub async fn find_by_id(&self, passenger_id: i64) -> AppResult<Option<Passenger>> {
        Ok(
            sqlx::query_as::<_, Passenger>("SELECT * FROM passengers WHERE id = ?")
                .bind(passenger_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    pub async fn find_by_user(&self, user_id: i64) -> AppResult<Vec<Passenger>> {
        Ok(sqlx::query_as::<_, Passenger>(
            "SELECT * FROM passengers WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn get_passenger(
        &self,
        caller: &AuthenticatedUser,
        passenger_id: i64,
    ) -> AppResult<Passenger> {
        let passenger = self
            .find_by_id(passenger_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Passenger not found".into()))?;

        if !policy::can_access(caller.user_id, caller.role, passenger.user_id) {
            return Err(AppError::Forbidden(
                "Not authorized to view this passenger".into(),
            ));
        }

        Ok(passenger)
    }

    pub async fn update_passenger(
        &self,
        caller: &AuthenticatedUser,
        passenger_id: i64,
        request: PassengerUpdateRequest,
    ) -> AppResult<Passenger> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let passenger = self
            .find_by_id(passenger_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Passenger not found".into()))?;

        if !policy::can_access(caller.user_id, caller.role, passenger.user_id) {
            return Err(AppError::Forbidden(
                "Not authorized to update this passenger".into(),
            ));
        }

        sqlx::query(
            r#"
            UPDATE passengers
            SET first_name = ?,
                last_name = ?,
                date_of_birth = ?,
                passport_number = ?,
                nationality = ?,
                email = ?,
                phone = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
        )
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(request.date_of_birth)
        .bind(&request.passport_number)
        .bind(&request.nationality)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(passenger_id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(passenger_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Passenger not found".into()))
    }

    // Cascades to the passenger's bookings at the storage layer.
    pub async fn delete_passenger(
        &self,
        caller: &AuthenticatedUser,
        passenger_id: i64,
    ) -> AppResult<()> {
        let passenger = self
            .find_by_id(passenger_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Passenger not found".into()))?;

        if !policy::can_access(caller.user_id, caller.role, passenger.user_id) {
            return Err(AppError::Forbidden(
                "Not authorized to delete this passenger".into(),
            ));
        }

        sqlx::query("DELETE FROM passengers WHERE id = ?")
            .bind(passenger_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // Admin listing joined with the owning user
    pub async fn find_all(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> AppResult<Vec<PassengerDetail>> {
        Ok(sqlx::query_as::<_, PassengerDetail>(
            r#"
            SELECT
                p.id, p.user_id, p.first_name, p.last_name, p.date_of_birth,
                p.passport_number, p.nationality, p.email, p.phone,
                p.created_at, p.updated_at,
                u.name AS user_name, u.email AS user_email
            FROM passengers p
            JOIN users u ON p.user_id = u.id
            ORDER BY p.created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit.unwrap_or(DEFAULT_PAGE_SIZE))
        .bind(offset.unwrap_or(0))
        .fetch_all(&self.pool)
        .await?)
    }
}
