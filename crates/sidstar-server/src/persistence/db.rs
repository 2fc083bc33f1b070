//! Database connection and initialization.

use anyhow::{Context, Result};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

const IN_MEMORY: &str = ":memory:";
const SCHEMA: &str = include_str!("../../migrations/001_init.sql");

/// Database connection wrapper.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Get the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Initialize the SQLite database.
///
/// Creates the database file if it doesn't exist, applies the schema,
/// and returns a connection pool. `:memory:` opens a private in-memory
/// database held on a single connection that is never recycled.
pub async fn init_database(db_path: &str, max_connections: u32) -> Result<Database> {
    info!("Connecting to database: {}", db_path);

    let pool = if db_path == IN_MEMORY {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?
    } else {
        if let Some(parent) = Path::new(db_path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await?
    };

    apply_schema(&pool).await?;

    Ok(Database { pool })
}

/// Create the chart table and index. Every statement is `IF NOT EXISTS`.
async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .context("failed to apply chart schema")?;
    info!("Chart schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_database() {
        let db = init_database(":memory:", 1).await.unwrap();

        let result: (i32,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='charts'",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();

        assert_eq!(result.0, 1);
    }

    #[tokio::test]
    async fn test_schema_is_reapplicable() {
        let db = init_database(":memory:", 4).await.unwrap();
        sqlx::query(
            "INSERT INTO charts (id, airport_id, name, chart_type, map_url)
             VALUES ('A-1', 'A', 'A 1', 'SID', '/a.png')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        apply_schema(db.pool()).await.unwrap();

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM charts")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count.0, 1);
    }
}
