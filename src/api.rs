use std::convert::Infallible;

use sqlx::sqlite::SqlitePool;
use warp::http::StatusCode;
use warp::reply::Reply;
use warp::Filter;

use crate::db;
use crate::schema::WeeklyRecord;

fn json_body_record() -> impl Filter<Extract = (WeeklyRecord,), Error = warp::Rejection> + Clone {
    warp::body::content_length_limit(1024 * 16).and(warp::body::json())
}

fn with_pool(pool: SqlitePool) -> impl Filter<Extract = (SqlitePool,), Error = Infallible> + Clone {
    warp::any().map(move || pool.clone())
}

fn salary_path() -> impl Filter<Extract = (), Error = warp::Rejection> + Clone {
    warp::path!("api" / "salary")
}

// Filters
pub fn list_records(
    pool: SqlitePool,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    salary_path()
        .and(warp::get())
        .and(with_pool(pool))
        .and_then(list_records_handler)
}

pub fn upsert_record(
    pool: SqlitePool,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    salary_path()
        .and(warp::post())
        .and(json_body_record())
        .and(with_pool(pool))
        .and_then(upsert_record_handler)
}

pub fn delete_all_records(
    pool: SqlitePool,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    salary_path()
        .and(warp::delete())
        .and(with_pool(pool))
        .and_then(delete_all_records_handler)
}

pub fn routes(
    pool: SqlitePool,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    list_records(pool.clone())
        .or(upsert_record(pool.clone()))
        .or(delete_all_records(pool))
        .with(warp::trace::request())
}

// Handlers
async fn list_records_handler(pool: SqlitePool) -> Result<warp::reply::Response, Infallible> {
    match db::read_all_records(&pool).await {
        Ok(records) => Ok(warp::reply::json(&records).into_response()),
        Err(e) => {
            tracing::error!(error = ?e, "Failed to read weekly entries");
            Ok(warp::reply::with_status(
                "Error reading entries.",
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .into_response())
        }
    }
}

async fn upsert_record_handler(
    record: WeeklyRecord,
    pool: SqlitePool,
) -> Result<impl warp::Reply, Infallible> {
    match db::upsert_record(&pool, &record).await {
        Ok(_) => Ok(StatusCode::OK),
        Err(e) => {
            tracing::error!(error = ?e, day = %record.day, "Failed to save weekly entry");
            Ok(StatusCode::BAD_REQUEST)
        }
    }
}

async fn delete_all_records_handler(pool: SqlitePool) -> Result<impl warp::Reply, Infallible> {
    match db::delete_all_records(&pool).await {
        Ok(_) => Ok(warp::reply::with_status("Entries deleted.", StatusCode::OK)),
        Err(e) => {
            tracing::error!(error = ?e, "Failed to delete weekly entries");
            Ok(warp::reply::with_status(
                "Error deleting entries.",
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}
