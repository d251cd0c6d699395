use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Direction;

/// A single broker execution, as returned by the fill-list endpoint.
/// Several fills can share an `order_id`; together they make up one
/// logical trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fill {
    pub id: i64,
    pub order_id: i64,
    pub contract_id: i64,
    /// "Buy" or "Sell".
    pub action: String,
    /// May arrive signed depending on the account; aggregation uses |qty|.
    pub qty: Decimal,
    pub price: Decimal,
    #[serde(default)]
    pub commission: Option<Decimal>,
    pub timestamp: DateTime<Utc>,
}

/// One order's fills collapsed into a single logical entry.
///
/// The symbol is not known yet at aggregation time; it is attached after the
/// contract lookup succeeds for the group.
#[derive(Debug, Clone)]
pub struct AggregatedOrder {
    pub order_id: i64,
    pub contract_id: i64,
    pub total_quantity: Decimal,
    pub weighted_avg_price: Decimal,
    pub total_fees: Decimal,
    pub direction: Direction,
    pub entry_time: DateTime<Utc>,
}
