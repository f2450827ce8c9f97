use chrono::{NaiveDate, NaiveDateTime};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, JsonSchema)]
pub struct Passenger {
    pub id: i64,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub passport_number: String,
    pub nationality: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Admin listing row: passenger joined with the owning user.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, JsonSchema)]
pub struct PassengerDetail {
    pub id: i64,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub passport_number: String,
    pub nationality: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub user_name: String,
    pub user_email: String,
}

#[derive(Debug, Clone, Deserialize, Validate, JsonSchema)]
pub struct PassengerCreateRequest {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    #[validate(length(min = 3, max = 50))]
    pub passport_number: String,
    #[validate(length(min = 1))]
    pub nationality: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, JsonSchema)]
pub struct PassengerUpdateRequest {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    #[validate(length(min = 3, max = 50))]
    pub passport_number: String,
    #[validate(length(min = 1))]
    pub nationality: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct PassengerData {
    pub passenger: Passenger,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct PassengersData {
    pub passengers: Vec<Passenger>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct PassengerDetailsData {
    pub passengers: Vec<PassengerDetail>,
}
