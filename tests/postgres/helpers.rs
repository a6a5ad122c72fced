//! Shared helpers for `PostgreSQL` integration tests.

use std::env;
use std::sync::OnceLock;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use diesel::connection::SimpleConnection;
use eyre::{Result, WrapErr, eyre};
use mockable::DefaultClock;
use tasktrack::consistency::adapters::PostgresCascadeStore;
use tasktrack::store::PostgresStore;
use tasktrack::task::adapters::postgres::PostgresTaskRepository;
use tasktrack::user::adapters::postgres::PostgresUserRepository;
use tasktrack::user::domain::{NewUser, Passport, UserProfile};
use tokio::sync::{Mutex, MutexGuard};

/// Variable naming the test database.
pub const DATABASE_URL_ENV: &str = "TASKTRACK_TEST_DATABASE_URL";

const RESET_SQL: &str = "TRUNCATE TABLE tasks, users RESTART IDENTITY CASCADE;";

static DATABASE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Repositories over a freshly truncated database. Holding the harness
/// keeps other tests off the database.
pub struct PgHarness {
    pub store: PostgresStore,
    pub users: PostgresUserRepository,
    pub tasks: PostgresTaskRepository,
    pub cascade: PostgresCascadeStore,
    _lock: MutexGuard<'static, ()>,
}

/// Connects, creates the schema, and empties both tables.
///
/// Returns `None` when no test database is configured.
pub async fn connect() -> Result<Option<PgHarness>> {
    let Ok(url) = env::var(DATABASE_URL_ENV) else {
        eprintln!("{DATABASE_URL_ENV} is not set; skipping PostgreSQL test");
        return Ok(None);
    };
    let lock = DATABASE_LOCK.get_or_init(|| Mutex::new(())).lock().await;

    let store = PostgresStore::connect(&url, 4, Duration::from_secs(5))
        .wrap_err("connect to test database")?;
    store.ensure_schema().await?;
    let pool = store.pool().clone();
    tokio::task::spawn_blocking(move || -> Result<()> {
        let mut connection = pool.get()?;
        connection.batch_execute(RESET_SQL)?;
        Ok(())
    })
    .await
    .map_err(|err| eyre!("reset task failed: {err}"))??;

    Ok(Some(PgHarness {
        users: PostgresUserRepository::new(store.clone()),
        tasks: PostgresTaskRepository::new(store.clone()),
        cascade: PostgresCascadeStore::new(store.clone()),
        store,
        _lock: lock,
    }))
}

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}

pub fn new_user(passport: &str, surname: &str) -> NewUser {
    NewUser::new(
        Passport::parse(passport).expect("valid passport"),
        UserProfile::new(surname, "Ivan", "Moscow").expect("valid profile"),
        &DefaultClock,
    )
}
