//! On-device key-value store holding the working copy of the week.

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::entry::TimeEntry;
use crate::error::Result;

pub const ENTRIES_KEY: &str = "@weekly_entries";
pub const RATE_KEY: &str = "@hourly_rate";

/// What a load found. Absent keys are not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalWeek {
    pub entries: Option<Vec<TimeEntry>>,
    pub rate: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LocalStore {
    pool: SqlitePool,
}

impl LocalStore {
    #[tracing::instrument]
    pub async fn open(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await?;

        Ok(LocalStore { pool })
    }

    pub async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(
            sqlx::query_scalar::<_, String>("SELECT value FROM kv WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    pub async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO kv (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self, entries))]
    pub async fn save_week(&self, entries: &[TimeEntry; 7], rate: &str) -> Result<()> {
        let json = serde_json::to_string(entries)?;

        let mut tx = self.pool.begin().await?;
        for (key, value) in [(ENTRIES_KEY, json.as_str()), (RATE_KEY, rate)] {
            sqlx::query(
                "INSERT INTO kv (key, value) VALUES (?, ?)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            )
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn load_week(&self) -> Result<LocalWeek> {
        let entries = match self.get_item(ENTRIES_KEY).await? {
            Some(json) => Some(serde_json::from_str::<Vec<TimeEntry>>(&json)?),
            None => None,
        };
        let rate = self.get_item(RATE_KEY).await?;

        Ok(LocalWeek { entries, rate })
    }

    #[tracing::instrument(skip(self))]
    pub async fn clear_week(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for key in [ENTRIES_KEY, RATE_KEY] {
            sqlx::query("DELETE FROM kv WHERE key = ?")
                .bind(key)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(())
    }
}
