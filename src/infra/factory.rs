use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::{AppState, Repositories};
use crate::infra::realtime::broadcast_feed::BroadcastChangeFeed;
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_pricing_repo::PostgresPricingRepo,
    postgres_profile_repo::PostgresProfileRepo, postgres_slot_repo::PostgresSlotRepo,
    postgres_sport_repo::PostgresSportRepo, postgres_timing_repo::PostgresTimingRepo,
    postgres_venue_repo::PostgresVenueRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_pricing_repo::SqlitePricingRepo,
    sqlite_profile_repo::SqliteProfileRepo, sqlite_slot_repo::SqliteSlotRepo,
    sqlite_sport_repo::SqliteSportRepo, sqlite_timing_repo::SqliteTimingRepo,
    sqlite_venue_repo::SqliteVenueRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let change_feed = Arc::new(BroadcastChangeFeed::new(config.change_feed_capacity));

    let repos = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;
        postgres_repositories(pool)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;
        sqlite_repositories(pool)
    };

    info!("Venue time zone {}, booking horizon {} days", config.venue_timezone, config.booking_horizon_days);
    AppState::assemble(config.clone(), repos, change_feed)
}

pub fn postgres_repositories(pool: PgPool) -> Repositories {
    Repositories {
        venue_repo: Arc::new(PostgresVenueRepo::new(pool.clone())),
        sport_repo: Arc::new(PostgresSportRepo::new(pool.clone())),
        timing_repo: Arc::new(PostgresTimingRepo::new(pool.clone())),
        pricing_repo: Arc::new(PostgresPricingRepo::new(pool.clone())),
        slot_repo: Arc::new(PostgresSlotRepo::new(pool.clone())),
        booking_repo: Arc::new(PostgresBookingRepo::new(pool.clone())),
        profile_repo: Arc::new(PostgresProfileRepo::new(pool)),
    }
}

pub fn sqlite_repositories(pool: SqlitePool) -> Repositories {
    Repositories {
        venue_repo: Arc::new(SqliteVenueRepo::new(pool.clone())),
        sport_repo: Arc::new(SqliteSportRepo::new(pool.clone())),
        timing_repo: Arc::new(SqliteTimingRepo::new(pool.clone())),
        pricing_repo: Arc::new(SqlitePricingRepo::new(pool.clone())),
        slot_repo: Arc::new(SqliteSlotRepo::new(pool.clone())),
        booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
        profile_repo: Arc::new(SqliteProfileRepo::new(pool)),
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
