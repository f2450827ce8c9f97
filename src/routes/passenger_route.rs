use crate::models::passenger::{
    PassengerCreateRequest, PassengerData, PassengerUpdateRequest, PassengersData,
};
use crate::models::response::{ApiResponse, MessageResponse};
use crate::services::passenger_service::PassengerService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Create a passenger profile
#[openapi(tag = "Passengers")]
#[post("/passengers", format = "json", data = "<request>")]
pub async fn create_passenger(
    request: Json<PassengerCreateRequest>,
    auth: AuthenticatedUser,
    passenger_service: &State<PassengerService>,
) -> Result<status::Created<Json<ApiResponse<PassengerData>>>, AppError> {
    let passenger = passenger_service
        .create_passenger(&auth, request.into_inner())
        .await?;
    let location = format!("/api/passengers/{}", passenger.id);
    Ok(status::Created::new(location)
        .body(Json(ApiResponse::success(PassengerData { passenger }))))
}

/// List own passenger profiles
#[openapi(tag = "Passengers")]
#[get("/passengers")]
pub async fn get_my_passengers(
    auth: AuthenticatedUser,
    passenger_service: &State<PassengerService>,
) -> Result<Json<ApiResponse<PassengersData>>, AppError> {
    let passengers = passenger_service.find_by_user(auth.user_id).await?;
    Ok(Json(ApiResponse::list(
        passengers.len(),
        PassengersData { passengers },
    )))
}

/// Get passenger by id (owner or admin)
#[openapi(tag = "Passengers")]
#[get("/passengers/<id>")]
pub async fn get_passenger(
    id: i64,
    auth: AuthenticatedUser,
    passenger_service: &State<PassengerService>,
) -> Result<Json<ApiResponse<PassengerData>>, AppError> {
    let passenger = passenger_service.get_passenger(&auth, id).await?;
    Ok(Json(ApiResponse::success(PassengerData { passenger })))
}

/// Update passenger (owner or admin)
#[openapi(tag = "Passengers")]
#[put("/passengers/<id>", format = "json", data = "<request>")]
pub async fn update_passenger(
    id: i64,
    request: Json<PassengerUpdateRequest>,
    auth: AuthenticatedUser,
    passenger_service: &State<PassengerService>,
) -> Result<Json<ApiResponse<PassengerData>>, AppError> {
    let passenger = passenger_service
        .update_passenger(&auth, id, request.into_inner())
        .await?;
    Ok(Json(ApiResponse::success(PassengerData { passenger })))
}

/// Delete passenger (owner or admin)
#[openapi(tag = "Passengers")]
#[delete("/passengers/<id>")]
pub async fn delete_passenger(
    id: i64,
    auth: AuthenticatedUser,
    passenger_service: &State<PassengerService>,
) -> Result<Json<MessageResponse>, AppError> {
    passenger_service.delete_passenger(&auth, id).await?;
    Ok(Json(MessageResponse::new("Passenger deleted successfully")))
}
