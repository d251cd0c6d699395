//! Read-side performance views.
//!
//! Every view is a pure function over a slice of trades, so each one is
//! independently computable and testable without a database. Callers fetch
//! the trade set once (typically `trade_repo::closed_trades`) and hand it
//! to whichever views they need; the functions themselves re-filter to the
//! closed / P&L-bearing subset they are defined over.

pub mod advanced;
pub mod equity;
pub mod hold_time;
pub mod overview;
pub mod time_buckets;

pub use advanced::{advanced_metrics, AdvancedMetrics};
pub use equity::{equity_curve, max_drawdown, EquityPoint};
pub use hold_time::{hold_time, HoldTimeBucket, HoldTimeStats};
pub use overview::{by_strategy, by_symbol, overall, GroupStats, OverallStats};
pub use time_buckets::{by_day_of_week, by_hour, daily, monthly, BucketStats};

use rust_decimal::Decimal;

use crate::models::Trade;

/// Closed trades carrying a realized P&L, in input order.
fn closed(trades: &[Trade]) -> Vec<&Trade> {
    trades.iter().filter(|t| t.profit_loss.is_some()).collect()
}

/// Win rate as a 0..100 percentage; 0 when there is nothing to divide by.
fn win_rate_pct(wins: usize, total: usize) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(wins as i64) / Decimal::from(total as i64) * Decimal::ONE_HUNDRED
}

/// Mean of a sum over a count, 0 when the count is 0.
fn safe_avg(sum: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    sum / Decimal::from(count as i64)
}

#[cfg(test)]
pub(crate) mod testutil {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::models::Trade;

    pub fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap()
    }

    /// A closed trade with the given P&L, held for `hold_hours`.
    pub fn closed_trade(symbol: &str, entry: DateTime<Utc>, hold_hours: i64, pl: i64) -> Trade {
        let exit_time = entry + Duration::hours(hold_hours);
        Trade {
            id: Uuid::new_v4(),
            symbol: symbol.into(),
            direction: "LONG".into(),
            entry_time: entry,
            exit_time: Some(exit_time),
            entry_price: Decimal::from(100),
            exit_price: Some(Decimal::from(100 + pl.signum())),
            quantity: 1,
            fees: Decimal::ZERO,
            stop_loss: None,
            take_profit: None,
            strategy: None,
            notes: None,
            status: "CLOSED".into(),
            profit_loss: Some(Decimal::from(pl)),
            profit_loss_percent: Some(Decimal::from(pl)),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn open_trade(symbol: &str, entry: DateTime<Utc>) -> Trade {
        Trade {
            exit_time: None,
            exit_price: None,
            status: "OPEN".into(),
            profit_loss: None,
            profit_loss_percent: None,
            ..closed_trade(symbol, entry, 0, 0)
        }
    }
}
