use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::Row;

use crate::entry::Day;
use crate::schema::WeeklyRecord;
use crate::time::AmPm;

pub async fn setup_pool(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid DATABASE_URL: {}", database_url))?
        .create_if_missing(true);

    Ok(SqlitePool::connect_with(options).await?)
}

pub async fn setup_db(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS weekly_entries (
            day TEXT PRIMARY KEY,
            day_index INTEGER NOT NULL,
            in_time TEXT NOT NULL,
            out_time TEXT NOT NULL,
            in_am_pm TEXT,
            out_am_pm TEXT,
            total_hours REAL,
            salary REAL,
            leave INTEGER NOT NULL,
            rate REAL
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

fn parse_am_pm(value: Option<String>) -> Result<Option<AmPm>> {
    value.map(|v| v.parse::<AmPm>()).transpose().map_err(Into::into)
}

fn record_from_row(row: &SqliteRow) -> Result<WeeklyRecord> {
    let day: String = row.try_get("day")?;

    Ok(WeeklyRecord {
        day: day.parse::<Day>()?,
        in_time: row.try_get("in_time")?,
        out_time: row.try_get("out_time")?,
        in_am_pm: parse_am_pm(row.try_get("in_am_pm")?)?,
        out_am_pm: parse_am_pm(row.try_get("out_am_pm")?)?,
        total_hours: row.try_get("total_hours")?,
        salary: row.try_get("salary")?,
        leave: row.try_get("leave")?,
        rate: row.try_get("rate")?,
    })
}

#[tracing::instrument(skip(pool))]
pub async fn read_all_records(pool: &SqlitePool) -> Result<Vec<WeeklyRecord>> {
    let rows = sqlx::query("SELECT * FROM weekly_entries ORDER BY day_index")
        .fetch_all(pool)
        .await?;

    rows.iter().map(record_from_row).collect()
}

/// Insert the record, replacing whatever was stored for the same day.
#[tracing::instrument(skip(pool, record), fields(day = %record.day))]
pub async fn upsert_record(pool: &SqlitePool, record: &WeeklyRecord) -> Result<()> {
    sqlx::query(
        "INSERT INTO weekly_entries
            (day, day_index, in_time, out_time, in_am_pm, out_am_pm, total_hours, salary, leave, rate)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(day) DO UPDATE SET
            in_time = excluded.in_time,
            out_time = excluded.out_time,
            in_am_pm = excluded.in_am_pm,
            out_am_pm = excluded.out_am_pm,
            total_hours = excluded.total_hours,
            salary = excluded.salary,
            leave = excluded.leave,
            rate = excluded.rate",
    )
    .bind(record.day.name())
    .bind(record.day.index() as i64)
    .bind(&record.in_time)
    .bind(&record.out_time)
    .bind(record.in_am_pm.map(AmPm::as_str))
    .bind(record.out_am_pm.map(AmPm::as_str))
    .bind(record.total_hours)
    .bind(record.salary)
    .bind(record.leave)
    .bind(record.rate)
    .execute(pool)
    .await?;

    Ok(())
}

#[tracing::instrument(skip(pool))]
pub async fn delete_all_records(pool: &SqlitePool) -> Result<u64> {
    let done = sqlx::query("DELETE FROM weekly_entries")
        .execute(pool)
        .await?;

    Ok(done.rows_affected())
}
