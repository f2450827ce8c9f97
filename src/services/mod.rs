pub mod booking_service;
pub mod flight_service;
pub mod passenger_service;
pub mod user_service;
