use crate::models::response::ApiResponse;
use crate::models::user::{AuthData, UserData, UserLoginRequest, UserRegistrationRequest};
use crate::services::user_service::UserService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Register a new user
#[openapi(tag = "Auth")]
#[post("/auth/register", format = "json", data = "<request>")]
pub async fn register(
    request: Json<UserRegistrationRequest>,
    user_service: &State<UserService>,
) -> Result<status::Created<Json<ApiResponse<AuthData>>>, AppError> {
    let auth = user_service.register_user(request.into_inner()).await?;
    let location = format!("/api/admin/users/{}", auth.user.id);
    Ok(status::Created::new(location).body(Json(ApiResponse::success(auth))))
}

/// Login a user
#[openapi(tag = "Auth")]
#[post("/auth/login", format = "json", data = "<request>")]
pub async fn login(
    request: Json<UserLoginRequest>,
    user_service: &State<UserService>,
) -> Result<Json<ApiResponse<AuthData>>, AppError> {
    let auth = user_service.login_user(request.into_inner()).await?;
    Ok(Json(ApiResponse::success(auth)))
}

/// Get the currently authenticated user
#[openapi(tag = "Auth")]
#[get("/auth/me")]
pub async fn me(
    auth: AuthenticatedUser,
    user_service: &State<UserService>,
) -> Result<Json<ApiResponse<UserData>>, AppError> {
    let user = user_service.get_profile(auth.user_id).await?;
    Ok(Json(ApiResponse::success(UserData { user })))
}
