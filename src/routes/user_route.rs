use crate::models::response::ApiResponse;
use crate::models::user::{UserData, UserProfileUpdateRequest};
use crate::services::user_service::UserService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Get own profile
#[openapi(tag = "Users")]
#[get("/users/profile")]
pub async fn get_profile(
    auth: AuthenticatedUser,
    user_service: &State<UserService>,
) -> Result<Json<ApiResponse<UserData>>, AppError> {
    let user = user_service.get_profile(auth.user_id).await?;
    Ok(Json(ApiResponse::success(UserData { user })))
}

/// Update own profile
#[openapi(tag = "Users")]
#[put("/users/profile", format = "json", data = "<request>")]
pub async fn update_profile(
    request: Json<UserProfileUpdateRequest>,
    auth: AuthenticatedUser,
    user_service: &State<UserService>,
) -> Result<Json<ApiResponse<UserData>>, AppError> {
    let user = user_service
        .update_profile(auth.user_id, request.into_inner())
        .await?;
    Ok(Json(ApiResponse::success(UserData { user })))
}
