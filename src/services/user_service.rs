use crate::models::response::DEFAULT_PAGE_SIZE;
use crate::models::user::{
    AuthData, Role, User, UserLoginRequest, UserProfile, UserProfileUpdateRequest,
    UserRegistrationRequest,
};
use crate::utils::error::{AppError, AppResult};
use crate::utils::jwt;
use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use validator::Validate;

const PROFILE_COLUMNS: &str = "id, email, name, phone, role, created_at, updated_at";

#[derive(Clone)]
pub struct UserService {
    pool: SqlitePool,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        UserService { pool }
    }

    // Register a new user
    pub async fn register_user(&self, request: UserRegistrationRequest) -> AppResult<AuthData> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let existing = sqlx::query("SELECT id FROM users WHERE email = ?")
            .bind(&request.email)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(
                "User with this email already exists".into(),
            ));
        }

        // Hash password
        let hashed_password = hash(request.password.as_bytes(), DEFAULT_COST)
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let role = request.role.unwrap_or(Role::Passenger);

        let result = sqlx::query(
            "INSERT INTO users (email, password, name, phone, role) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&request.email)
        .bind(&hashed_password)
        .bind(&request.name)
        .bind(&request.phone)
        .bind(role)
        .execute(&self.pool)
        .await?;

        let user = self.get_profile(result.last_insert_rowid()).await?;
        let token = jwt::generate_token(user.id, user.role)
            .map_err(|e| AppError::AuthError(e.to_string()))?;

        Ok(AuthData { user, token })
    }

    // Login user
    pub async fn login_user(&self, request: UserLoginRequest) -> AppResult<AuthData> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(&request.email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid credentials".into()))?;

        // Verify password
        let password_matches = verify(request.password.as_bytes(), &user.password)
            .map_err(|e| AppError::AuthError(e.to_string()))?;

        if !password_matches {
            return Err(AppError::AuthError("Invalid credentials".into()));
        }

        let token = jwt::generate_token(user.id, user.role)
            .map_err(|e| AppError::AuthError(e.to_string()))?;

        Ok(AuthData {
            user: UserProfile {
                id: user.id,
                email: user.email,
                name: user.name,
                phone: user.phone,
                role: user.role,
                created_at: user.created_at,
                updated_at: user.updated_at,
            },
            token,
        })
    }

    pub async fn get_profile(&self, user_id: i64) -> AppResult<UserProfile> {
        sqlx::query_as::<_, UserProfile>(&format!(
            "SELECT {} FROM users WHERE id = ?",
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        request: UserProfileUpdateRequest,
    ) -> AppResult<UserProfile> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        // 404 before write so a missing row never looks like a success
        self.get_profile(user_id).await?;

        sqlx::query(
            "UPDATE users SET name = ?, phone = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        )
        .bind(&request.name)
        .bind(&request.phone)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        self.get_profile(user_id).await
    }

    // Admin listing with optional role filter
    pub async fn find_all(
        &self,
        role: Option<Role>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> AppResult<Vec<UserProfile>> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM users",
            PROFILE_COLUMNS
        ));
        if let Some(role) = role {
            builder.push(" WHERE role = ").push_bind(role);
        }
        builder
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit.unwrap_or(DEFAULT_PAGE_SIZE))
            .push(" OFFSET ")
            .push_bind(offset.unwrap_or(0));

        Ok(builder
            .build_query_as::<UserProfile>()
            .fetch_all(&self.pool)
            .await?)
    }

    // Cascades to the user's passengers and bookings at the storage layer.
    pub async fn delete_user(&self, user_id: i64) -> AppResult<()> {
        self.get_profile(user_id).await?;

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
