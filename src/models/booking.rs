use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use validator::Validate;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display, EnumString, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BookingClass {
    Economy,
    Business,
    First,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display, EnumString, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, JsonSchema)]
pub struct Booking {
    pub id: i64,
    pub booking_reference: String,
    pub user_id: i64,
    pub flight_id: i64,
    pub passenger_id: i64,
    pub seat_number: Option<String>,
    pub booking_class: BookingClass,
    pub status: BookingStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Booking joined with its user, flight and passenger, as returned to callers.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, JsonSchema)]
pub struct BookingDetail {
    pub id: i64,
    pub booking_reference: String,
    pub user_id: i64,
    pub flight_id: i64,
    pub passenger_id: i64,
    pub seat_number: Option<String>,
    pub booking_class: BookingClass,
    pub status: BookingStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub user_name: String,
    pub user_email: String,
    pub flight_number: String,
    pub airline: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
    pub price: f64,
    pub first_name: String,
    pub last_name: String,
    pub passport_number: String,
}

#[derive(Debug, Clone, Deserialize, Validate, JsonSchema)]
pub struct BookingCreateRequest {
    pub flight_id: i64,
    pub passenger_id: i64,
    #[validate(length(min = 1, max = 10))]
    pub seat_number: Option<String>,
    pub booking_class: Option<BookingClass>,
}

#[derive(Debug, Clone, Default)]
pub struct BookingListFilter {
    pub status: Option<BookingStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct BookingData {
    pub booking: BookingDetail,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct BookingsData {
    pub bookings: Vec<BookingDetail>,
}
