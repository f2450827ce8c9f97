use crate::models::booking::{BookingListFilter, BookingStatus, BookingsData};
use crate::models::passenger::PassengerDetailsData;
use crate::models::response::{ApiResponse, MessageResponse};
use crate::models::user::{Role, UsersData};
use crate::services::booking_service::BookingService;
use crate::services::passenger_service::PassengerService;
use crate::services::user_service::UserService;
use crate::utils::error::AppError;
use crate::utils::jwt::AdminUser;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use std::str::FromStr;

/// List all users (admin only)
#[openapi(tag = "Admin")]
#[get("/admin/users?<role>&<limit>&<offset>")]
pub async fn get_all_users(
    role: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
    _admin: AdminUser,
    user_service: &State<UserService>,
) -> Result<Json<ApiResponse<UsersData>>, AppError> {
    let role = role
        .map(|r| {
            Role::from_str(&r).map_err(|_| AppError::ValidationError("Invalid role".into()))
        })
        .transpose()?;
    let users = user_service.find_all(role, limit, offset).await?;
    Ok(Json(ApiResponse::list(users.len(), UsersData { users })))
}

/// List all bookings (admin only)
#[openapi(tag = "Admin")]
#[get("/admin/bookings?<status>&<limit>&<offset>")]
pub async fn get_all_bookings(
    status: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
    _admin: AdminUser,
    booking_service: &State<BookingService>,
) -> Result<Json<ApiResponse<BookingsData>>, AppError> {
    let status = status
        .map(|s| {
            BookingStatus::from_str(&s)
                .map_err(|_| AppError::ValidationError("Invalid booking status".into()))
        })
        .transpose()?;
    let filter = BookingListFilter {
        status,
        limit,
        offset,
    };
    let bookings = booking_service.find_all(filter).await?;
    Ok(Json(ApiResponse::list(
        bookings.len(),
        BookingsData { bookings },
    )))
}

/// List all passengers (admin only)
#[openapi(tag = "Admin")]
#[get("/admin/passengers?<limit>&<offset>")]
pub async fn get_all_passengers(
    limit: Option<i64>,
    offset: Option<i64>,
    _admin: AdminUser,
    passenger_service: &State<PassengerService>,
) -> Result<Json<ApiResponse<PassengerDetailsData>>, AppError> {
    let passengers = passenger_service.find_all(limit, offset).await?;
    Ok(Json(ApiResponse::list(
        passengers.len(),
        PassengerDetailsData { passengers },
    )))
}

/// List bookings on a flight (admin only)
#[openapi(tag = "Admin")]
#[get("/admin/flights/<id>/bookings")]
pub async fn get_flight_bookings(
    id: i64,
    _admin: AdminUser,
    booking_service: &State<BookingService>,
) -> Result<Json<ApiResponse<BookingsData>>, AppError> {
    let bookings = booking_service.find_by_flight(id).await?;
    Ok(Json(ApiResponse::list(
        bookings.len(),
        BookingsData { bookings },
    )))
}

/// Delete a user (admin only)
#[openapi(tag = "Admin")]
#[delete("/admin/users/<id>")]
pub async fn delete_user(
    id: i64,
    _admin: AdminUser,
    user_service: &State<UserService>,
) -> Result<Json<MessageResponse>, AppError> {
    user_service.delete_user(id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
