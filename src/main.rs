#[macro_use]
extern crate rocket;
extern crate rocket_okapi;

use dotenv::dotenv;
use flight_booking_api::db::Database;
use flight_booking_api::routes;
use flight_booking_api::services::booking_service::BookingService;
use flight_booking_api::services::flight_service::FlightService;
use flight_booking_api::services::passenger_service::PassengerService;
use flight_booking_api::services::user_service::UserService;
use flight_booking_api::swagger::swagger_ui;
use rocket::fairing::AdHoc;
use rocket_okapi::openapi_get_routes;
use rocket_okapi::swagger_ui::*;

#[launch]
async fn rocket() -> _ {
    dotenv().ok();

    // Connect to the database
    let database = Database::new(
        &std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
    )
    .await
    .expect("Failed to connect to database");

    Database::init_schema(database.get_pool())
        .await
        .expect("Failed to initialize database schema");

    let pool = database.get_pool().clone();

    // Initialize the services
    let user_service = UserService::new(pool.clone());
    let flight_service = FlightService::new(pool.clone());
    let passenger_service = PassengerService::new(pool.clone());
    let booking_service = BookingService::new(pool);

    rocket::build()
        .manage(user_service)
        .manage(flight_service)
        .manage(passenger_service)
        .manage(booking_service)
        .mount(
            "/api",
            openapi_get_routes![
                routes::auth_route::register,
                routes::auth_route::login,
                routes::auth_route::me,
                routes::user_route::get_profile,
                routes::user_route::update_profile,
                routes::flight_route::get_all_flights,
                routes::flight_route::search_flights,
                routes::flight_route::get_flight,
                routes::flight_route::create_flight,
                routes::flight_route::update_flight,
                routes::flight_route::delete_flight,
                routes::passenger_route::create_passenger,
                routes::passenger_route::get_my_passengers,
                routes::passenger_route::get_passenger,
                routes::passenger_route::update_passenger,
                routes::passenger_route::delete_passenger,
                routes::booking_route::create_booking,
                routes::booking_route::get_my_bookings,
                routes::booking_route::get_booking,
                routes::booking_route::get_booking_by_reference,
                routes::booking_route::cancel_booking,
                routes::booking_route::delete_booking,
                routes::admin_route::get_all_users,
                routes::admin_route::get_all_bookings,
                routes::admin_route::get_all_passengers,
                routes::admin_route::get_flight_bookings,
                routes::admin_route::delete_user,
            ],
        )
        .mount("/swagger", make_swagger_ui(&swagger_ui()))
        .attach(AdHoc::on_response("CORS", |_, res| {
            Box::pin(async move {
                res.set_header(rocket::http::Header::new(
                    "Access-Control-Allow-Origin",
                    "*",
                ));
            })
        }))
}
