use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Trade;

use super::{closed, safe_avg, win_rate_pct};

/// Headline statistics across the whole journal. Counts cover every trade;
/// the money figures only the closed subset.
#[derive(Debug, Clone, Serialize)]
pub struct OverallStats {
    pub total_trades: usize,
    pub open_trades: usize,
    pub closed_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub total_profit_loss: Decimal,
    pub avg_profit_loss: Decimal,
    pub best_trade: Decimal,
    pub worst_trade: Decimal,
    pub avg_profit_loss_percent: Decimal,
    /// 0..100; 0 when no trade has closed yet.
    pub win_rate: Decimal,
}

pub fn overall(trades: &[Trade]) -> OverallStats {
    let closed = closed(trades);

    let winning = closed
        .iter()
        .filter(|t| t.profit_loss.unwrap_or_default() > Decimal::ZERO)
        .count();
    let losing = closed
        .iter()
        .filter(|t| t.profit_loss.unwrap_or_default() < Decimal::ZERO)
        .count();

    let pls: Vec<Decimal> = closed.iter().filter_map(|t| t.profit_loss).collect();
    let total_pl = pls.iter().copied().sum::<Decimal>();

    let pcts: Vec<Decimal> = closed
        .iter()
        .filter_map(|t| t.profit_loss_percent)
        .collect();

    OverallStats {
        total_trades: trades.len(),
        open_trades: trades.len() - closed.len(),
        closed_trades: closed.len(),
        winning_trades: winning,
        losing_trades: losing,
        total_profit_loss: total_pl,
        avg_profit_loss: safe_avg(total_pl, pls.len()),
        best_trade: pls.iter().copied().max().unwrap_or(Decimal::ZERO),
        worst_trade: pls.iter().copied().min().unwrap_or(Decimal::ZERO),
        avg_profit_loss_percent: safe_avg(pcts.iter().copied().sum(), pcts.len()),
        win_rate: win_rate_pct(winning, closed.len()),
    }
}

/// Per-group breakdown, ordered by descending total P&L (key ascending as
/// the tie-break so the ordering is reproducible).
#[derive(Debug, Clone, Serialize)]
pub struct GroupStats {
    pub key: String,
    pub trades_count: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: Decimal,
    pub total_pl: Decimal,
    pub avg_pl: Decimal,
    pub best_trade: Decimal,
    pub worst_trade: Decimal,
}

pub fn by_symbol(trades: &[Trade]) -> Vec<GroupStats> {
    grouped(trades, |t| t.symbol.clone())
}

pub fn by_strategy(trades: &[Trade]) -> Vec<GroupStats> {
    grouped(trades, |t| {
        t.strategy.clone().unwrap_or_else(|| "No Strategy".into())
    })
}

fn grouped(trades: &[Trade], key_of: impl Fn(&Trade) -> String) -> Vec<GroupStats> {
    use std::collections::HashMap;

    let mut groups: HashMap<String, Vec<&Trade>> = HashMap::new();
    for trade in closed(trades) {
        groups.entry(key_of(trade)).or_default().push(trade);
    }

    let mut stats: Vec<GroupStats> = groups
        .into_iter()
        .map(|(key, members)| {
            let pls: Vec<Decimal> = members.iter().filter_map(|t| t.profit_loss).collect();
            let wins = pls.iter().filter(|pl| **pl > Decimal::ZERO).count();
            let losses = pls.iter().filter(|pl| **pl < Decimal::ZERO).count();
            let total_pl = pls.iter().copied().sum::<Decimal>();

            GroupStats {
                trades_count: members.len(),
                wins,
                losses,
                win_rate: win_rate_pct(wins, members.len()),
                total_pl,
                avg_pl: safe_avg(total_pl, pls.len()),
                best_trade: pls.iter().copied().max().unwrap_or(Decimal::ZERO),
                worst_trade: pls.iter().copied().min().unwrap_or(Decimal::ZERO),
                key,
            }
        })
        .collect();

    stats.sort_by(|a, b| b.total_pl.cmp(&a.total_pl).then(a.key.cmp(&b.key)));
    stats
}
