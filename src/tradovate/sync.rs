use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;

use crate::db::settings_repo::{self, BrokerSettings};
use crate::ingestion::aggregator::aggregate_fills;
use crate::ingestion::normalizer;
use crate::ingestion::pipeline;
use crate::models::{AggregatedOrder, ImportSource, TradeCandidate, TradeDraft};

use super::client::{BrokerError, TradovateClient};

#[derive(Debug, Error)]
pub enum SyncError {
    /// Auth rejection or transport failure; aborts the remainder of the
    /// run. Trades committed before the failure stand, and the rerun is
    /// idempotent through the ledger.
    #[error(transparent)]
    Broker(#[from] BrokerError),

    #[error("no broker account available")]
    NoAccounts,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub total_orders: usize,
    pub imported: usize,
    pub skipped: usize,
    /// Orders dropped in this run (failed contract lookup or a quantity
    /// that does not normalize); they will be retried by the next run.
    pub failed_orders: Vec<i64>,
}

/// One manual sync run against the broker: authenticate, pull the
/// account's fills, collapse them into orders, resolve symbols, and hand
/// the result to the import pipeline.
pub async fn run_sync(
    pool: &PgPool,
    client: &TradovateClient,
    settings: &BrokerSettings,
) -> Result<SyncReport, SyncError> {
    let session = client
        .authenticate(&settings.username, &settings.password)
        .await?;

    let accounts = client.list_accounts(&session).await?;
    let account = accounts
        .iter()
        .find(|a| !a.archived)
        .ok_or(SyncError::NoAccounts)?;

    let fills = client.list_fills(&session, account.id).await?;
    if fills.is_empty() {
        settings_repo::touch_last_sync(pool, settings.id)
            .await
            .map_err(SyncError::Internal)?;
        tracing::info!(account = account.id, "Sync run found no fills");
        return Ok(SyncReport::default());
    }

    let orders = aggregate_fills(&fills);
    let mut report = SyncReport {
        total_orders: orders.len(),
        ..SyncReport::default()
    };

    let mut candidates: Vec<TradeCandidate> = Vec::with_capacity(orders.len());
    for order in &orders {
        // A bad order must not take the batch down with it.
        let contract = match client.get_contract(&session, order.contract_id).await {
            Ok(contract) => contract,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    order_id = order.order_id,
                    contract_id = order.contract_id,
                    "Contract lookup failed, skipping order"
                );
                report.failed_orders.push(order.order_id);
                continue;
            }
        };

        match candidate_from_order(order, &contract.name) {
            Ok(candidate) => candidates.push(candidate),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    order_id = order.order_id,
                    "Aggregated order failed normalization, skipping"
                );
                report.failed_orders.push(order.order_id);
            }
        }
    }

    let (imported, skipped) =
        pipeline::import_candidates(pool, ImportSource::Tradovate, candidates)
            .await
            .map_err(SyncError::Internal)?;
    report.imported = imported;
    report.skipped = skipped;

    settings_repo::touch_last_sync(pool, settings.id)
        .await
        .map_err(SyncError::Internal)?;

    tracing::info!(
        account = account.id,
        total_orders = report.total_orders,
        imported = report.imported,
        skipped = report.skipped,
        failed = report.failed_orders.len(),
        "Sync run finished"
    );

    Ok(report)
}

/// Broker-side orders arrive entry-only: the position may still be open,
/// so they import as OPEN trades and close later by manual update.
fn candidate_from_order(
    order: &AggregatedOrder,
    symbol: &str,
) -> Result<TradeCandidate, normalizer::ValidationError> {
    let quantity = if order.total_quantity.fract().is_zero() {
        order.total_quantity.to_i64()
    } else {
        None
    };

    let draft = TradeDraft {
        symbol: Some(symbol.to_string()),
        direction: Some(order.direction.as_str().to_string()),
        entry_time: Some(order.entry_time),
        entry_price: Some(order.weighted_avg_price),
        quantity,
        fees: Some(order.total_fees),
        notes: Some(format!(
            "Imported from Tradovate - Order ID: {}",
            order.order_id
        )),
        ..TradeDraft::default()
    };

    let mut candidate = normalizer::normalize(&draft)?;
    candidate.external_id = Some(normalizer::broker_external_id(order.order_id));
    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn order(qty: Decimal) -> AggregatedOrder {
        AggregatedOrder {
            order_id: 501,
            contract_id: 9001,
            total_quantity: qty,
            weighted_avg_price: Decimal::from(15_000),
            total_fees: Decimal::new(420, 2),
            direction: Direction::Long,
            entry_time: Utc.with_ymd_and_hms(2025, 3, 10, 14, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_candidate_carries_broker_external_id() {
        let candidate = candidate_from_order(&order(Decimal::from(2)), "NQZ5").unwrap();
        assert_eq!(candidate.external_id.as_deref(), Some("tradovate_501"));
        assert_eq!(candidate.symbol, "NQZ5");
        assert_eq!(candidate.quantity, 2);
        assert_eq!(candidate.status.as_str(), "OPEN");
        assert_eq!(candidate.profit_loss, None);
    }

    #[test]
    fn test_fractional_quantity_rejected() {
        let result = candidate_from_order(&order(Decimal::new(25, 1)), "NQZ5");
        assert!(result.is_err());
    }
}
