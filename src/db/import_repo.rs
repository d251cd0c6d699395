use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::{ImportRecord, ImportSource};

pub async fn find(pool: &PgPool, external_id: &str) -> anyhow::Result<Option<ImportRecord>> {
    let record = sqlx::query_as::<_, ImportRecord>(
        "SELECT * FROM import_records WHERE external_id = $1",
    )
    .bind(external_id)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Fast-path ledger check. Only classifies the common rerun case as a
/// cheap skip; the unique index on external_id is what actually makes
/// imports at-most-once under concurrency.
pub async fn exists(pool: &PgPool, external_id: &str) -> anyhow::Result<bool> {
    Ok(find(pool, external_id).await?.is_some())
}

/// Record an import inside the caller's transaction. A concurrent import
/// of the same external_id surfaces as a unique violation, which rolls the
/// whole row (trade insert included) back.
pub async fn record(
    executor: impl PgExecutor<'_>,
    external_id: &str,
    source: ImportSource,
    trade_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO import_records (external_id, source, trade_id) VALUES ($1, $2, $3)")
        .bind(external_id)
        .bind(source.as_str())
        .bind(trade_id)
        .execute(executor)
        .await?;

    Ok(())
}

/// Postgres unique_violation, the signature of a lost dedup race.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505")
    )
}
