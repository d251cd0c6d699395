use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::{Trade, TradeCandidate};

/// Insert a validated candidate. Takes any executor so the import pipeline
/// can run it inside the same transaction as the ledger write.
pub async fn insert_trade(
    executor: impl PgExecutor<'_>,
    candidate: &TradeCandidate,
) -> anyhow::Result<Trade> {
    let trade = sqlx::query_as::<_, Trade>(
        r#"
        INSERT INTO trades (
            symbol, direction, entry_time, exit_time, entry_price, exit_price,
            quantity, fees, stop_loss, take_profit, strategy, notes,
            status, profit_loss, profit_loss_percent
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        RETURNING *
        "#,
    )
    .bind(&candidate.symbol)
    .bind(candidate.direction.as_str())
    .bind(candidate.entry_time)
    .bind(candidate.exit_time)
    .bind(candidate.entry_price)
    .bind(candidate.exit_price)
    .bind(candidate.quantity)
    .bind(candidate.fees)
    .bind(candidate.stop_loss)
    .bind(candidate.take_profit)
    .bind(&candidate.strategy)
    .bind(&candidate.notes)
    .bind(candidate.status.as_str())
    .bind(candidate.profit_loss)
    .bind(candidate.profit_loss_percent)
    .fetch_one(executor)
    .await?;

    Ok(trade)
}

/// Full-record update; recomputed status/P&L come in with the candidate.
/// Returns None when the id is unknown.
pub async fn update_trade(
    pool: &PgPool,
    id: Uuid,
    candidate: &TradeCandidate,
) -> anyhow::Result<Option<Trade>> {
    let trade = sqlx::query_as::<_, Trade>(
        r#"
        UPDATE trades SET
            symbol = $2, direction = $3, entry_time = $4, exit_time = $5,
            entry_price = $6, exit_price = $7, quantity = $8, fees = $9,
            stop_loss = $10, take_profit = $11, strategy = $12, notes = $13,
            status = $14, profit_loss = $15, profit_loss_percent = $16,
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&candidate.symbol)
    .bind(candidate.direction.as_str())
    .bind(candidate.entry_time)
    .bind(candidate.exit_time)
    .bind(candidate.entry_price)
    .bind(candidate.exit_price)
    .bind(candidate.quantity)
    .bind(candidate.fees)
    .bind(candidate.stop_loss)
    .bind(candidate.take_profit)
    .bind(&candidate.strategy)
    .bind(&candidate.notes)
    .bind(candidate.status.as_str())
    .bind(candidate.profit_loss)
    .bind(candidate.profit_loss_percent)
    .fetch_optional(pool)
    .await?;

    Ok(trade)
}

pub async fn get_trade(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Trade>> {
    let trade = sqlx::query_as::<_, Trade>("SELECT * FROM trades WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(trade)
}

/// List trades newest first, optionally filtered by status.
pub async fn list_trades(pool: &PgPool, status: Option<&str>) -> anyhow::Result<Vec<Trade>> {
    let trades = match status {
        Some(status) => {
            sqlx::query_as::<_, Trade>(
                "SELECT * FROM trades WHERE status = $1 ORDER BY entry_time DESC",
            )
            .bind(status)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Trade>("SELECT * FROM trades ORDER BY entry_time DESC")
                .fetch_all(pool)
                .await?
        }
    };

    Ok(trades)
}

/// Returns true when a row was deleted. The import-record row (if any)
/// goes with it via the FK cascade, freeing the external id for re-import.
pub async fn delete_trade(pool: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM trades WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// The closed subset every analytics view is computed over, in the
/// canonical order: entry_time ascending, id as the deterministic
/// tie-break.
pub async fn closed_trades(pool: &PgPool) -> anyhow::Result<Vec<Trade>> {
    let trades = sqlx::query_as::<_, Trade>(
        r#"
        SELECT * FROM trades
        WHERE status = 'CLOSED' AND profit_loss IS NOT NULL
        ORDER BY entry_time ASC, id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(trades)
}
