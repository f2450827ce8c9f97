use rocket::http::ContentType;
use rocket::http::Status;
use rocket::response::Responder;
use rocket::Request;
use rocket::Response;
use rocket_okapi::JsonSchema;
use serde::Serialize;
use serde_json::json;
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug, Serialize, JsonSchema)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("{0}")]
    AuthError(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    CapacityExceeded(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("Service temporarily unavailable: {0}")]
    Transient(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".into()),
            sqlx::Error::PoolTimedOut => {
                AppError::Transient("Storage connection timed out".into())
            }
            sqlx::Error::Io(e) => AppError::Transient(e.to_string()),
            sqlx::Error::Database(e) if e.is_unique_violation() => {
                AppError::Conflict(e.message().to_string())
            }
            e => AppError::DatabaseError(e.to_string()),
        }
    }
}

// Define a type alias for the result type
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> Status {
        match self {
            AppError::DatabaseError(_) => Status::InternalServerError,
            AppError::AuthError(_) => Status::Unauthorized,
            AppError::Forbidden(_) => Status::Forbidden,
            AppError::ValidationError(_)
            | AppError::CapacityExceeded(_)
            | AppError::InvalidState(_) => Status::BadRequest,
            AppError::NotFound(_) => Status::NotFound,
            AppError::Conflict(_) => Status::Conflict,
            AppError::Transient(_) => Status::ServiceUnavailable,
        }
    }
}

// Format all errors into the `{status, message}` envelope at route level
#[rocket::async_trait]
impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, _: &'r Request<'_>) -> rocket::response::Result<'static> {
        let status = self.status();
        // 4xx carries "fail", 5xx carries "error"
        let label = if status.code >= 500 { "error" } else { "fail" };

        let body = json!({
            "status": label,
            "message": self.to_string(),
        });

        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(None, Cursor::new(body.to_string()))
            .ok()
    }
}
