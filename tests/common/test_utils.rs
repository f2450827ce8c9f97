use flight_booking_api::db::Database;
use once_cell::sync::OnceCell;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::Error;
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

static TEST_DB: OnceCell<Mutex<Option<TestDb>>> = OnceCell::new();
static DB_PATH: OnceCell<PathBuf> = OnceCell::new();

#[derive(Debug)]
pub struct TestDb {
    pub pool: SqlitePool,
}

// One throwaway database file per test binary, named by timestamp so
// parallel runs never collide.
fn database_path(suite: &str) -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            let timestamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos();
            let suite = suite
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect::<String>();
            std::env::temp_dir().join(format!("flight_booking_test_{}_{}.db", suite, timestamp))
        })
        .clone()
}

impl TestDb {
    // Setup function to initialize the test database once per test binary
    pub async fn get_instance(suite: &str) -> Result<SqlitePool, Error> {
        let test_db = TEST_DB.get_or_init(|| Mutex::new(None));
        let mut guard = test_db.lock().await;

        // Reuse the existing pool instead of creating one per test
        if let Some(db) = guard.as_ref() {
            return Ok(db.pool.clone());
        }

        let db = Self::setup_database(suite).await?;
        let pool = db.pool.clone();
        *guard = Some(db);
        Ok(pool)
    }

    async fn setup_database(suite: &str) -> Result<Self, Error> {
        let db_path = database_path(suite);

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(10))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        Database::init_schema(&pool).await?;

        Ok(Self { pool })
    }

    // Teardown function to remove the database files after the test run
    pub fn cleanup_database() {
        if let Some(path) = DB_PATH.get() {
            let _ = std::fs::remove_file(path);
            let _ = std::fs::remove_file(path.with_extension("db-wal"));
            let _ = std::fs::remove_file(path.with_extension("db-shm"));
        }
    }
}
