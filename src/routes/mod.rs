pub mod admin_route;
pub mod auth_route;
pub mod booking_route;
pub mod flight_route;
pub mod passenger_route;
pub mod user_route;
