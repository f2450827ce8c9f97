use crate::models::booking::{
    BookingCreateRequest, BookingData, BookingListFilter, BookingStatus, BookingsData,
};
use crate::models::response::{ApiResponse, MessageResponse};
use crate::services::booking_service::BookingService;
use crate::utils::error::AppError;
use crate::utils::jwt::{AdminUser, AuthenticatedUser};
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use std::str::FromStr;

fn parse_status(status: Option<String>) -> Result<Option<BookingStatus>, AppError> {
    status
        .map(|s| {
            BookingStatus::from_str(&s)
                .map_err(|_| AppError::ValidationError("Invalid booking status".into()))
        })
        .transpose()
}

/// Create a booking
#[openapi(tag = "Bookings")]
#[post("/bookings", format = "json", data = "<request>")]
pub async fn create_booking(
    request: Json<BookingCreateRequest>,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<status::Created<Json<ApiResponse<BookingData>>>, AppError> {
    let booking = booking_service
        .create_booking(&auth, request.into_inner())
        .await?;
    let location = format!("/api/bookings/{}", booking.id);
    Ok(status::Created::new(location).body(Json(ApiResponse::success(BookingData { booking }))))
}

/// List own bookings
#[openapi(tag = "Bookings")]
#[get("/bookings?<status>&<limit>&<offset>")]
pub async fn get_my_bookings(
    status: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<Json<ApiResponse<BookingsData>>, AppError> {
    let filter = BookingListFilter {
        status: parse_status(status)?,
        limit,
        offset,
    };
    let bookings = booking_service.find_by_user(auth.user_id, filter).await?;
    Ok(Json(ApiResponse::list(
        bookings.len(),
        BookingsData { bookings },
    )))
}

/// Get booking by id (owner or admin)
#[openapi(tag = "Bookings")]
#[get("/bookings/<id>")]
pub async fn get_booking(
    id: i64,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<Json<ApiResponse<BookingData>>, AppError> {
    let booking = booking_service.get_booking(&auth, id).await?;
    Ok(Json(ApiResponse::success(BookingData { booking })))
}

/// Get booking by reference (owner or admin)
#[openapi(tag = "Bookings")]
#[get("/bookings/reference/<reference>")]
pub async fn get_booking_by_reference(
    reference: String,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<Json<ApiResponse<BookingData>>, AppError> {
    let booking = booking_service
        .get_booking_by_reference(&auth, &reference)
        .await?;
    Ok(Json(ApiResponse::success(BookingData { booking })))
}

/// Cancel a booking (owner or admin)
#[openapi(tag = "Bookings")]
#[patch("/bookings/<id>/cancel")]
pub async fn cancel_booking(
    id: i64,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<Json<ApiResponse<BookingData>>, AppError> {
    let booking = booking_service.cancel_booking(&auth, id).await?;
    Ok(Json(ApiResponse::success(BookingData { booking })))
}

/// Delete a booking (admin only)
#[openapi(tag = "Bookings")]
#[delete("/bookings/<id>")]
pub async fn delete_booking(
    id: i64,
    _admin: AdminUser,
    booking_service: &State<BookingService>,
) -> Result<Json<MessageResponse>, AppError> {
    booking_service.delete_booking(id).await?;
    Ok(Json(MessageResponse::new("Booking deleted successfully")))
}
