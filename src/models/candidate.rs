use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Direction, TradeStatus};

/// Raw trade input before validation. Every source (manual request body,
/// CSV row, aggregated broker order) is shaped into this one type at the
/// ingestion boundary; nothing looser travels further in.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TradeDraft {
    pub symbol: Option<String>,
    pub direction: Option<String>,
    pub entry_time: Option<DateTime<Utc>>,
    pub exit_time: Option<DateTime<Utc>>,
    pub entry_price: Option<Decimal>,
    pub exit_price: Option<Decimal>,
    pub quantity: Option<i64>,
    pub fees: Option<Decimal>,
    pub stop_loss: Option<Decimal>,
    pub take_profit: Option<Decimal>,
    pub strategy: Option<String>,
    pub notes: Option<String>,
}

/// A fully validated trade ready to persist. Status and P&L are already
/// derived: OPEN with no P&L until an exit price is present, CLOSED with
/// computed P&L once it is.
#[derive(Debug, Clone, Serialize)]
pub struct TradeCandidate {
    pub symbol: String,
    pub direction: Direction,
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
    pub entry_price: Decimal,
    pub exit_price: Option<Decimal>,
    pub quantity: i32,
    pub fees: Decimal,
    pub stop_loss: Option<Decimal>,
    pub take_profit: Option<Decimal>,
    pub strategy: Option<String>,
    pub notes: Option<String>,
    pub status: TradeStatus,
    pub profit_loss: Option<Decimal>,
    pub profit_loss_percent: Option<Decimal>,
    /// Dedup key for imported trades; None for manual entry.
    pub external_id: Option<String>,
}
