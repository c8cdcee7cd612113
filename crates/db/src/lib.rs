use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::SqlitePool;

/// How long a query waits on a lock held by the updater before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a read-only connection pool from a database URL.
///
/// Connections are opened lazily: the dataset file is produced by the
/// external updater and may not exist yet when the server starts. Queries
/// issued before it appears fail like any other data store error.
pub fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .read_only(true)
        .busy_timeout(BUSY_TIMEOUT);

    Ok(SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_lazy_with(options))
}

/// Verify the database is reachable by running a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
