use crate::{
    database::CREATE_USER_TEXT_TABLE,
    errors::{AppDomain, AppError},
};
use sqlx::PgPool;

/// Creates `user_text` if it does not exist. Also used as the liveness probe
/// when connecting.
pub async fn ensure_schema_ready(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(CREATE_USER_TEXT_TABLE)
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|e| AppError {
            domain: AppDomain::Schema,
            value: format!("Failed to create table: {}", e),
        })
}
