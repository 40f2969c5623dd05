use crate::database::create_tables::ensure_schema_ready;
use crate::errors::{AppDomain, AppError};
use log::{info, warn};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::future::Future;
use std::time::Duration;

/// Opens the store and checks the schema, retrying with a fixed delay.
/// `retry_count` is the number of attempts made after the first one fails.
pub async fn connect_with_retry(
    database_url: &str,
    retry_count: u32,
    retry_delay: Duration,
) -> Result<PgPool, AppError> {
    retry_with_fixed_delay(retry_count, retry_delay, || connect_and_prepare(database_url))
        .await
        .map_err(|e| AppError {
            domain: AppDomain::Connection,
            value: format!(
                "Could not connect to database after {} attempts: {}",
                retry_count + 1,
                e
            ),
        })
}

async fn connect_and_prepare(database_url: &str) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(database_url)
        .await
        .map_err(|e| AppError::new(AppDomain::Connection, e.to_string()))?;
    if let Err(e) = ensure_schema_ready(&pool).await {
        pool.close().await;
        return Err(e);
    }
    Ok(pool)
}

/// Runs `operation` until it succeeds or `retry_count` retries have failed,
/// sleeping `retry_delay` between attempts. Returns the last error.
pub async fn retry_with_fixed_delay<T, F, Fut>(
    retry_count: u32,
    retry_delay: Duration,
    mut operation: F,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => {
                info!("Database ready after {} attempt(s)", attempt);
                return Ok(value);
            }
            Err(e) if attempt > retry_count => return Err(e),
            Err(e) => {
                warn!(
                    "Database attempt {}/{} failed, retrying in {:?}: {}",
                    attempt,
                    retry_count + 1,
                    retry_delay,
                    e
                );
                tokio::time::sleep(retry_delay).await;
            }
        }
    }
}
