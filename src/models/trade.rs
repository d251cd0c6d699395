use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for the trades table.
///
/// `direction` is LONG/SHORT and `status` OPEN/CLOSED; both are stored as
/// text and validated at the ingestion boundary. `profit_loss` and
/// `profit_loss_percent` are non-null exactly when `exit_price` is.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trade {
    pub id: Uuid,
    pub symbol: String,
    pub direction: String,
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
    pub status: String,
    pub profit_loss: Option<Decimal>,
    pub profit_loss_percent: Option<Decimal>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Trade {
    /// True once an exit price has been recorded.
    pub fn is_closed(&self) -> bool {
        self.status == "CLOSED"
    }
}
