//! Database module - SQLite store for finished battles

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

#[cfg(test)]
pub mod test_utils;

/// Database handle wrapping SQLite connection pool
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection
    /// If path is None, uses in-memory database (for testing)
    pub async fn new(path: Option<&str>) -> Result<Self> {
        let (conn_str, max_connections) = match path {
            Some(p) => (format!("sqlite:{}?mode=rwc", p), 4),
            // Every in-memory connection is its own database
            None => ("sqlite::memory:".to_string(), 1),
        };

        let options = SqliteConnectOptions::from_str(&conn_str)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);
        if path.is_none() {
            // Keep the single connection (and its data) alive
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = pool_options.connect_with(options).await?;

        let db = Self { pool };
        db.run_migrations().await?;

        Ok(db)
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations...");

        // One row per finished battle, up to four heroes
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS battle_results (
                id TEXT PRIMARY KEY,
                result TEXT NOT NULL CHECK (result IN ('victory', 'defeat')),
                boss_name TEXT NOT NULL,
                round_count INTEGER NOT NULL,
                hero1_name TEXT,
                hero1_hp INTEGER,
                hero2_name TEXT,
                hero2_hp INTEGER,
                hero3_name TEXT,
                hero3_hp INTEGER,
                hero4_name TEXT,
                hero4_hp INTEGER,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_battle_results_created ON battle_results(created_at)",
        )
        .execute(&self.pool)
        .await?;

        info!("Database migrations complete");
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check if database is healthy
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
