use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

// Database connection manager
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    // Create a new database connection pool
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options)
            .await?;

        Ok(Database { pool })
    }

    // Get a reference to the connection pool
    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        let statements = [
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                name TEXT NOT NULL,
                phone TEXT,
                role TEXT NOT NULL DEFAULT 'passenger'
                    CHECK (role IN ('passenger', 'admin')),
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",

            "CREATE TABLE IF NOT EXISTS flights (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                flight_number TEXT NOT NULL UNIQUE,
                airline TEXT NOT NULL,
                origin TEXT NOT NULL,
                destination TEXT NOT NULL,
                departure_time DATETIME NOT NULL,
                arrival_time DATETIME NOT NULL,
                total_seats INTEGER NOT NULL,
                available_seats INTEGER NOT NULL
                    CHECK (available_seats >= 0 AND available_seats <= total_seats),
                price REAL NOT NULL,
                status TEXT NOT NULL DEFAULT 'scheduled'
                    CHECK (status IN ('scheduled', 'boarding', 'departed', 'arrived', 'cancelled', 'delayed')),
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",

            "CREATE TABLE IF NOT EXISTS passengers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                date_of_birth DATE NOT NULL,
                passport_number TEXT NOT NULL UNIQUE,
                nationality TEXT NOT NULL,
                email TEXT,
                phone TEXT,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",

            "CREATE TABLE IF NOT EXISTS bookings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                booking_reference TEXT NOT NULL UNIQUE,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                flight_id INTEGER NOT NULL REFERENCES flights(id) ON DELETE CASCADE,
                passenger_id INTEGER NOT NULL REFERENCES passengers(id) ON DELETE CASCADE,
                seat_number TEXT,
                booking_class TEXT NOT NULL DEFAULT 'economy'
                    CHECK (booking_class IN ('economy', 'business', 'first')),
                status TEXT NOT NULL DEFAULT 'confirmed'
                    CHECK (status IN ('confirmed', 'cancelled', 'completed')),
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",

            "CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)",
            "CREATE INDEX IF NOT EXISTS idx_flights_number ON flights(flight_number)",
            "CREATE INDEX IF NOT EXISTS idx_flights_origin_dest ON flights(origin, destination)",
            "CREATE INDEX IF NOT EXISTS idx_flights_departure ON flights(departure_time)",
            "CREATE INDEX IF NOT EXISTS idx_bookings_user ON bookings(user_id)",
            "CREATE INDEX IF NOT EXISTS idx_bookings_flight ON bookings(flight_id)",
            "CREATE INDEX IF NOT EXISTS idx_bookings_reference ON bookings(booking_reference)",
            "CREATE INDEX IF NOT EXISTS idx_passengers_user ON passengers(user_id)",
            "CREATE INDEX IF NOT EXISTS idx_passengers_passport ON passengers(passport_number)",
        ];

        for statement in statements {
            sqlx::query(statement).execute(pool).await?;
        }

        log::info!("database schema ready");
        Ok(())
    }
}
