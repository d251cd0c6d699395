use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Trade;

use super::{safe_avg, win_rate_pct};

/// Fixed duration partition in hours: [0,1) [1,4) [4,8) [8,72) [72,168)
/// [168,∞). The "1-3d" band starts at 8 hours so every duration lands in
/// exactly one bucket.
const BUCKETS: &[(&str, i64)] = &[
    ("<1h", 1),
    ("1-4h", 4),
    ("4-8h", 8),
    ("1-3d", 72),
    ("3-7d", 168),
    ("7d+", i64::MAX),
];

#[derive(Debug, Clone, Serialize)]
pub struct HoldTimeBucket {
    pub range: String,
    pub count: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: Decimal,
    pub total_pl: Decimal,
}

/// Hold-duration breakdown. Mean hold times are in hours.
#[derive(Debug, Clone, Serialize)]
pub struct HoldTimeStats {
    pub avg_hold_winners: Decimal,
    pub avg_hold_losers: Decimal,
    pub avg_hold_all: Decimal,
    pub by_range: Vec<HoldTimeBucket>,
}

/// Only trades with both timestamps and a realized P&L participate.
pub fn hold_time(trades: &[Trade]) -> HoldTimeStats {
    let eligible: Vec<(Decimal, Decimal)> = trades
        .iter()
        .filter_map(|t| {
            let exit_time = t.exit_time?;
            let pl = t.profit_loss?;
            let seconds = (exit_time - t.entry_time).num_seconds();
            let hours = Decimal::from(seconds) / Decimal::from(3600);
            Some((hours, pl))
        })
        .collect();

    let mut buckets: Vec<HoldTimeBucket> = BUCKETS
        .iter()
        .map(|(range, _)| HoldTimeBucket {
            range: (*range).to_string(),
            count: 0,
            wins: 0,
            losses: 0,
            win_rate: Decimal::ZERO,
            total_pl: Decimal::ZERO,
        })
        .collect();

    let mut winner_hours = Decimal::ZERO;
    let mut loser_hours = Decimal::ZERO;
    let mut all_hours = Decimal::ZERO;
    let mut winners = 0usize;
    let mut losers = 0usize;

    for (hours, pl) in &eligible {
        let slot = BUCKETS
            .iter()
            .position(|(_, upper)| *hours < Decimal::from(*upper))
            .unwrap_or(BUCKETS.len() - 1);

        let bucket = &mut buckets[slot];
        bucket.count += 1;
        bucket.total_pl += *pl;
        if *pl > Decimal::ZERO {
            bucket.wins += 1;
            winners += 1;
            winner_hours += *hours;
        } else if *pl < Decimal::ZERO {
            bucket.losses += 1;
            losers += 1;
            loser_hours += *hours;
        }
        all_hours += *hours;
    }

    for bucket in &mut buckets {
        bucket.win_rate = win_rate_pct(bucket.wins, bucket.count);
    }

    HoldTimeStats {
        avg_hold_winners: safe_avg(winner_hours, winners),
        avg_hold_losers: safe_avg(loser_hours, losers),
        avg_hold_all: safe_avg(all_hours, eligible.len()),
        by_range: buckets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testutil::{closed_trade, open_trade, ts};

    fn bucket<'a>(stats: &'a HoldTimeStats, range: &str) -> &'a HoldTimeBucket {
        stats.by_range.iter().find(|b| b.range == range).unwrap()
    }

    #[test]
    fn test_exact_24_hours_lands_in_1_3d() {
        let stats = hold_time(&[closed_trade("A", ts(2, 10), 24, 100)]);
        assert_eq!(bucket(&stats, "1-3d").count, 1);
        assert_eq!(bucket(&stats, "4-8h").count, 0);
    }

    #[test]
    fn test_bucket_boundaries() {
        let trades = vec![
            closed_trade("A", ts(1, 0), 0, 10),   // 0h → <1h
            closed_trade("B", ts(2, 0), 1, 10),   // 1h → 1-4h
            closed_trade("C", ts(3, 0), 4, 10),   // 4h → 4-8h
            closed_trade("D", ts(4, 0), 8, 10),   // 8h → 1-3d
            closed_trade("E", ts(5, 0), 72, 10),  // 3d → 3-7d
            closed_trade("F", ts(6, 0), 168, 10), // 7d → 7d+
        ];

        let stats = hold_time(&trades);
        for range in ["<1h", "1-4h", "4-8h", "1-3d", "3-7d", "7d+"] {
            assert_eq!(bucket(&stats, range).count, 1, "range {range}");
        }
    }

    #[test]
    fn test_mean_hold_times_split_by_outcome() {
        let trades = vec![
            closed_trade("A", ts(1, 0), 2, 100),
            closed_trade("B", ts(2, 0), 6, 50),
            closed_trade("C", ts(3, 0), 10, -80),
        ];

        let stats = hold_time(&trades);
        assert_eq!(stats.avg_hold_winners, Decimal::from(4));
        assert_eq!(stats.avg_hold_losers, Decimal::from(10));
        assert_eq!(stats.avg_hold_all, Decimal::from(6));
    }

    #[test]
    fn test_open_trades_excluded() {
        let stats = hold_time(&[open_trade("A", ts(2, 10))]);
        assert_eq!(stats.avg_hold_all, Decimal::ZERO);
        assert!(stats.by_range.iter().all(|b| b.count == 0));
    }

    #[test]
    fn test_bucket_win_rate_and_pl() {
        let trades = vec![
            closed_trade("A", ts(1, 0), 2, 100),
            closed_trade("B", ts(2, 0), 2, -40),
        ];

        let stats = hold_time(&trades);
        let b = bucket(&stats, "1-4h");
        assert_eq!(b.count, 2);
        assert_eq!(b.win_rate, Decimal::from(50));
        assert_eq!(b.total_pl, Decimal::from(60));
    }
}
