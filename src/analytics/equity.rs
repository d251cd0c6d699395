use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::Trade;

/// One equity-curve point per closed trade.
#[derive(Debug, Clone, Serialize)]
pub struct EquityPoint {
    pub trade_id: Uuid,
    pub date: DateTime<Utc>,
    pub symbol: String,
    pub trade_pl: Decimal,
    pub cumulative_pl: Decimal,
}

/// Cumulative P&L over closed trades in entry-time order, ties broken by
/// trade id so the curve comes out the same on every computation.
pub fn equity_curve(trades: &[Trade]) -> Vec<EquityPoint> {
    let mut closed: Vec<&Trade> = trades.iter().filter(|t| t.profit_loss.is_some()).collect();
    closed.sort_by(|a, b| a.entry_time.cmp(&b.entry_time).then(a.id.cmp(&b.id)));

    let mut cumulative = Decimal::ZERO;
    closed
        .into_iter()
        .map(|trade| {
            let trade_pl = trade.profit_loss.unwrap_or(Decimal::ZERO);
            cumulative += trade_pl;
            EquityPoint {
                trade_id: trade.id,
                date: trade.entry_time,
                symbol: trade.symbol.clone(),
                trade_pl,
                cumulative_pl: cumulative,
            }
        })
        .collect()
}

/// Largest peak-to-trough decline of the cumulative curve, as an absolute
/// (non-negative) amount. A single forward pass: the peak only ever rises,
/// and the drawdown at each step is the gap back up to it.
pub fn max_drawdown(curve: &[EquityPoint]) -> Decimal {
    let mut peak: Option<Decimal> = None;
    let mut max_dd = Decimal::ZERO;

    for point in curve {
        let peak_value = match peak {
            Some(p) => p.max(point.cumulative_pl),
            None => point.cumulative_pl,
        };
        peak = Some(peak_value);

        let drawdown = peak_value - point.cumulative_pl;
        if drawdown > max_dd {
            max_dd = drawdown;
        }
    }

    max_dd
}
