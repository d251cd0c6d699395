use chrono::{Datelike, Timelike};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Trade;

use super::{closed, safe_avg, win_rate_pct};

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Aggregate for one time bucket (month, day, hour of day, weekday).
#[derive(Debug, Clone, Serialize)]
pub struct BucketStats {
    pub key: String,
    pub trades_count: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: Decimal,
    pub total_pl: Decimal,
    pub avg_pl: Decimal,
}

/// Closed trades bucketed by entry month, newest month first.
pub fn monthly(trades: &[Trade]) -> Vec<BucketStats> {
    let mut stats = bucketed(trades, |t| t.entry_time.format("%Y-%m").to_string());
    stats.sort_by(|a, b| b.key.cmp(&a.key));
    stats
}

/// Closed trades bucketed by entry date, newest day first.
pub fn daily(trades: &[Trade]) -> Vec<BucketStats> {
    let mut stats = bucketed(trades, |t| t.entry_time.format("%Y-%m-%d").to_string());
    stats.sort_by(|a, b| b.key.cmp(&a.key));
    stats
}

/// All 24 hours of the day, in order; hours without trades stay at zero so
/// the shape of the output never depends on the data.
pub fn by_hour(trades: &[Trade]) -> Vec<BucketStats> {
    fixed_domain(trades, 24, |t| t.entry_time.hour() as usize, |hour| {
        format!("{hour:02}:00")
    })
}

/// All seven weekdays, Sunday first.
pub fn by_day_of_week(trades: &[Trade]) -> Vec<BucketStats> {
    fixed_domain(
        trades,
        7,
        |t| t.entry_time.weekday().num_days_from_sunday() as usize,
        |day| DAY_NAMES[day].to_string(),
    )
}

fn bucketed(trades: &[Trade], key_of: impl Fn(&Trade) -> String) -> Vec<BucketStats> {
    use std::collections::HashMap;

    let mut groups: HashMap<String, Vec<&Trade>> = HashMap::new();
    for trade in closed(trades) {
        groups.entry(key_of(trade)).or_default().push(trade);
    }

    groups
        .into_iter()
        .map(|(key, members)| stats_for(key, &members))
        .collect()
}

fn fixed_domain(
    trades: &[Trade],
    size: usize,
    slot_of: impl Fn(&Trade) -> usize,
    label_of: impl Fn(usize) -> String,
) -> Vec<BucketStats> {
    let mut slots: Vec<Vec<&Trade>> = vec![Vec::new(); size];
    for trade in closed(trades) {
        slots[slot_of(trade)].push(trade);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(slot, members)| stats_for(label_of(slot), &members))
        .collect()
}

fn stats_for(key: String, members: &[&Trade]) -> BucketStats {
    let pls: Vec<Decimal> = members.iter().filter_map(|t| t.profit_loss).collect();
    let wins = pls.iter().filter(|pl| **pl > Decimal::ZERO).count();
    let losses = pls.iter().filter(|pl| **pl < Decimal::ZERO).count();
    let total_pl = pls.iter().copied().sum::<Decimal>();

    BucketStats {
        key,
        trades_count: members.len(),
        wins,
        losses,
        win_rate: win_rate_pct(wins, members.len()),
        total_pl,
        avg_pl: safe_avg(total_pl, pls.len()),
    }
}
