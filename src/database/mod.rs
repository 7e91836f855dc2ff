pub mod migrations;
pub mod models;
pub mod queries;
pub mod store;

pub use queries::SqliteStore;
pub use store::AttendanceStore;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

pub async fn create_connection(database_url: &str) -> Result<SqlitePool> {
    let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    // Every connection to an in-memory database is a fresh database, so keep exactly one alive.
    let pool = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_options)
            .await?
    } else {
        SqlitePool::connect_with(connect_options).await?
    };

    // Run migrations
    migrations::run_migrations(&pool).await?;

    Ok(pool)
}
