use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePool;

use payday::config::Settings;
use payday::{api, db, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::from_env()?;

    let subscriber = telemetry::get_subscriber("payday-d".into(), "info".into(), std::io::stdout);
    telemetry::init_subscriber(subscriber)?;

    let database_url = settings
        .database_url
        .as_deref()
        .context("DATABASE_URL env var must be set!")?;
    let pool = db::setup_pool(database_url).await?;
    db::setup_db(&pool).await?;

    run(pool, settings.port).await;

    Ok(())
}

async fn run(pool: SqlitePool, port: u16) {
    tracing::info!(port, "Serving weekly entries");
    warp::serve(api::routes(pool)).run(([0, 0, 0, 0], port)).await;
}
