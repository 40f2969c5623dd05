use crate::database::INSERT_USER_TEXT;
use crate::errors::{AppDomain, AppError};
use crate::user_text::UserTextRecord;
use sqlx::PgPool;
use std::future::Future;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    /// A row with the same id was already stored; nothing was written.
    Duplicate,
}

/// Write side of the store, as seen by the ingestion loop.
pub trait UserTextStore {
    fn upsert_record(
        &self,
        record: &UserTextRecord,
    ) -> impl Future<Output = Result<UpsertOutcome, AppError>> + Send;
}

pub async fn upsert_record(
    pool: &PgPool,
    record: &UserTextRecord,
) -> Result<UpsertOutcome, AppError> {
    let result = sqlx::query(INSERT_USER_TEXT)
        .bind(&record.id)
        .bind(&record.text)
        .bind(record.word_count)
        .execute(pool)
        .await
        .map_err(|e| AppError {
            domain: AppDomain::Persistence,
            value: format!("could not add user text into database: {}", e),
        })?;
    if result.rows_affected() > 0 {
        Ok(UpsertOutcome::Inserted)
    } else {
        Ok(UpsertOutcome::Duplicate)
    }
}

#[derive(Clone, Debug)]
pub struct PgUserTextStore {
    pool: PgPool,
}

impl PgUserTextStore {
    pub fn new(pool: PgPool) -> Self {
        PgUserTextStore { pool }
    }
}

impl UserTextStore for PgUserTextStore {
    async fn upsert_record(&self, record: &UserTextRecord) -> Result<UpsertOutcome, AppError> {
        upsert_record(&self.pool, record).await
    }
}
