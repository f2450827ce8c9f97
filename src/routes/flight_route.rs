use crate::models::flight::{
    FlightCreateRequest, FlightData, FlightSearchQuery, FlightStatus, FlightUpdateRequest,
    FlightsData,
};
use crate::models::response::{ApiResponse, MessageResponse};
use crate::services::flight_service::FlightService;
use crate::utils::error::AppError;
use crate::utils::jwt::AdminUser;
use chrono::NaiveDate;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use std::str::FromStr;

fn parse_status(status: Option<String>) -> Result<Option<FlightStatus>, AppError> {
    status
        .map(|s| {
            FlightStatus::from_str(&s)
                .map_err(|_| AppError::ValidationError("Invalid flight status".into()))
        })
        .transpose()
}

/// List flights
#[openapi(tag = "Flights")]
#[get("/flights?<status>&<limit>&<offset>")]
pub async fn get_all_flights(
    status: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
    flight_service: &State<FlightService>,
) -> Result<Json<ApiResponse<FlightsData>>, AppError> {
    let status = parse_status(status)?;
    let flights = flight_service.find_all(status, limit, offset).await?;
    Ok(Json(ApiResponse::list(
        flights.len(),
        FlightsData { flights },
    )))
}

/// Search flights
#[openapi(tag = "Flights")]
#[get("/flights/search?<origin>&<destination>&<departure_date>&<airline>&<status>&<limit>&<offset>")]
pub async fn search_flights(
    origin: Option<String>,
    destination: Option<String>,
    departure_date: Option<String>,
    airline: Option<String>,
    status: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
    flight_service: &State<FlightService>,
) -> Result<Json<ApiResponse<FlightsData>>, AppError> {
    let origin = origin.map(|s| s.trim().to_string()).unwrap_or_default();
    let destination = destination.map(|s| s.trim().to_string()).unwrap_or_default();
    if origin.is_empty() || destination.is_empty() {
        return Err(AppError::ValidationError(
            "Origin and destination are required".into(),
        ));
    }

    let departure_date = departure_date
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map_err(|_| AppError::ValidationError("Invalid departure date format".into()))
        })
        .transpose()?;
    let airline = airline
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let status = parse_status(status)?;

    let query = FlightSearchQuery {
        origin,
        destination,
        departure_date,
        airline,
        status,
        limit,
        offset,
    };
    let flights = flight_service.search(query).await?;
    Ok(Json(ApiResponse::list(
        flights.len(),
        FlightsData { flights },
    )))
}

/// Get flight by id
#[openapi(tag = "Flights")]
#[get("/flights/<id>")]
pub async fn get_flight(
    id: i64,
    flight_service: &State<FlightService>,
) -> Result<Json<ApiResponse<FlightData>>, AppError> {
    let flight = flight_service
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Flight not found".into()))?;
    Ok(Json(ApiResponse::success(FlightData { flight })))
}

/// Create a flight (admin only)
#[openapi(tag = "Flights")]
#[post("/flights", format = "json", data = "<request>")]
pub async fn create_flight(
    request: Json<FlightCreateRequest>,
    _admin: AdminUser,
    flight_service: &State<FlightService>,
) -> Result<status::Created<Json<ApiResponse<FlightData>>>, AppError> {
    let flight = flight_service.create_flight(request.into_inner()).await?;
    let location = format!("/api/flights/{}", flight.id);
    Ok(status::Created::new(location).body(Json(ApiResponse::success(FlightData { flight }))))
}

/// Update a flight (admin only)
#[openapi(tag = "Flights")]
#[put("/flights/<id>", format = "json", data = "<request>")]
pub async fn update_flight(
    id: i64,
    request: Json<FlightUpdateRequest>,
    _admin: AdminUser,
    flight_service: &State<FlightService>,
) -> Result<Json<ApiResponse<FlightData>>, AppError> {
    let flight = flight_service.update_flight(id, request.into_inner()).await?;
    Ok(Json(ApiResponse::success(FlightData { flight })))
}

/// Delete a flight (admin only)
#[openapi(tag = "Flights")]
#[delete("/flights/<id>")]
pub async fn delete_flight(
    id: i64,
    _admin: AdminUser,
    flight_service: &State<FlightService>,
) -> Result<Json<MessageResponse>, AppError> {
    flight_service.delete_flight(id).await?;
    Ok(Json(MessageResponse::new("Flight deleted successfully")))
}
