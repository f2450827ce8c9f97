use chrono::{NaiveDate, NaiveDateTime};
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
pub enum FlightStatus {
    Scheduled,
    Boarding,
    Departed,
    Arrived,
    Cancelled,
    Delayed,
}

impl FlightStatus {
    /// Seats can only be sold while the flight has not started its lifecycle.
    pub fn is_bookable(self) -> bool {
        matches!(self, FlightStatus::Scheduled | FlightStatus::Delayed)
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, JsonSchema)]
pub struct Flight {
    pub id: i64,
    pub flight_number: String,
    pub airline: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
    pub total_seats: i64,
    pub available_seats: i64,
    pub price: f64,
    pub status: FlightStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize, Validate, JsonSchema)]
pub struct FlightCreateRequest {
    #[validate(length(min = 2, max = 20))]
    pub flight_number: String,
    #[validate(length(min = 1))]
    pub airline: String,
    #[validate(length(min = 1))]
    pub origin: String,
    #[validate(length(min = 1))]
    pub destination: String,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
    #[validate(range(min = 1))]
    pub total_seats: i64,
    // defaults to total_seats when omitted
    pub available_seats: Option<i64>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    pub status: Option<FlightStatus>,
}

#[derive(Debug, Clone, Deserialize, Validate, JsonSchema)]
pub struct FlightUpdateRequest {
    #[validate(length(min = 2, max = 20))]
    pub flight_number: String,
    #[validate(length(min = 1))]
    pub airline: String,
    #[validate(length(min = 1))]
    pub origin: String,
    #[validate(length(min = 1))]
    pub destination: String,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
    #[validate(range(min = 1))]
    pub total_seats: i64,
    pub available_seats: i64,
    #[validate(range(min = 0.0))]
    pub price: f64,
    pub status: FlightStatus,
}

/// Conjunctive search filter; origin and destination are mandatory,
/// everything else narrows the result further.
#[derive(Debug, Clone)]
pub struct FlightSearchQuery {
    pub origin: String,
    pub destination: String,
    pub departure_date: Option<NaiveDate>,
    pub airline: Option<String>,
    pub status: Option<FlightStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct FlightData {
    pub flight: Flight,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct FlightsData {
    pub flights: Vec<Flight>,
}
