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
pub enum Role {
    Passenger,
    Admin,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// User record as exposed over the API, without the password hash.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, JsonSchema)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize, Validate, JsonSchema)]
pub struct UserRegistrationRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1))]
    pub name: String,
    pub phone: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UserLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct UserProfileUpdateRequest {
    #[validate(length(min = 1))]
    pub name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct AuthData {
    pub user: UserProfile,
    pub token: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct UserData {
    pub user: UserProfile,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct UsersData {
    pub users: Vec<UserProfile>,
}
