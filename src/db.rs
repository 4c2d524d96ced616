use anyhow::Result;
use sea_orm::{DatabaseConnection, SqlxSqliteConnector};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::{path::Path, time::Duration};

pub type DbPool = SqlitePool;
pub type OrmConn = DatabaseConnection;

/// Bumped whenever the products table changes shape. A database carrying a
/// different version is wiped and recreated.
pub const SCHEMA_VERSION: i64 = 1;

const SCHEMA: &str = include_str!("../migrations/0001_products.sql");

/// Open (or create) the SQLite database file at `path`.
pub async fn create_pool(path: &Path) -> Result<DbPool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::info!(path = %path.display(), "database connection established");
    Ok(pool)
}

/// Wrap an existing pool in a SeaORM connection so both share the same database.
pub fn create_orm_conn(pool: DbPool) -> OrmConn {
    SqlxSqliteConnector::from_sqlx_sqlite_pool(pool)
}

/// Apply the embedded schema. A schema version mismatch drops the products
/// table first; there is no data migration.
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    let version: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await?;

    if version != 0 && version != SCHEMA_VERSION {
        tracing::warn!(
            found = version,
            expected = SCHEMA_VERSION,
            "schema version mismatch, recreating products table"
        );
        sqlx::query("DROP TABLE IF EXISTS products")
            .execute(pool)
            .await?;
    }

    // Prepared statements run one command at a time.
    for stmt in SCHEMA.split(';') {
        let stmt = stmt.trim();
        if stmt.is_empty() {
            continue;
        }
        sqlx::query(stmt).execute(pool).await?;
    }

    sqlx::query(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))
        .execute(pool)
        .await?;

    Ok(())
}
