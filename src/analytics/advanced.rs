use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Trade;

use super::equity::{equity_curve, max_drawdown};
use super::{closed, safe_avg};

/// Risk/quality metrics over the closed subset. Every ratio degrades to 0
/// when its denominator is empty: a journal with no closed trades reports
/// zeros across the board, never NaN.
#[derive(Debug, Clone, Serialize)]
pub struct AdvancedMetrics {
    pub gross_profit: Decimal,
    pub gross_loss: Decimal,
    pub net_profit: Decimal,
    pub profit_factor: Decimal,
    pub avg_win: Decimal,
    pub avg_loss: Decimal,
    pub avg_rr_ratio: Decimal,
    pub expectancy: Decimal,
    pub max_drawdown: Decimal,
}

pub fn advanced_metrics(trades: &[Trade]) -> AdvancedMetrics {
    let closed = closed(trades);
    let pls: Vec<Decimal> = closed.iter().filter_map(|t| t.profit_loss).collect();

    let wins: Vec<Decimal> = pls.iter().copied().filter(|pl| *pl > Decimal::ZERO).collect();
    let losses: Vec<Decimal> = pls
        .iter()
        .copied()
        .filter(|pl| *pl < Decimal::ZERO)
        .map(|pl| pl.abs())
        .collect();

    let gross_profit = wins.iter().copied().sum::<Decimal>();
    let gross_loss = losses.iter().copied().sum::<Decimal>();

    let profit_factor = if gross_loss.is_zero() {
        Decimal::ZERO
    } else {
        gross_profit / gross_loss
    };

    let avg_win = safe_avg(gross_profit, wins.len());
    let avg_loss = safe_avg(gross_loss, losses.len());

    let avg_rr_ratio = if avg_loss.is_zero() {
        Decimal::ZERO
    } else {
        avg_win / avg_loss
    };

    // Expectancy works on the 0..1 win-rate fraction, not the 0..100
    // percentage the other views report.
    let expectancy = if pls.is_empty() {
        Decimal::ZERO
    } else {
        let win_fraction = Decimal::from(wins.len() as i64) / Decimal::from(pls.len() as i64);
        win_fraction * avg_win - (Decimal::ONE - win_fraction) * avg_loss
    };

    AdvancedMetrics {
        gross_profit,
        gross_loss,
        net_profit: gross_profit - gross_loss,
        profit_factor,
        avg_win,
        avg_loss,
        avg_rr_ratio,
        expectancy,
        max_drawdown: max_drawdown(&equity_curve(trades)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testutil::{closed_trade, ts};

    #[test]
    fn test_profit_factor_and_expectancy() {
        // Wins: 100, 200 → gross 300, avg 150. Losses: 50, 150 → gross 200, avg 100.
        let trades = vec![
            closed_trade("A", ts(1, 10), 1, 100),
            closed_trade("B", ts(2, 10), 1, -50),
            closed_trade("C", ts(3, 10), 1, 200),
            closed_trade("D", ts(4, 10), 1, -150),
        ];

        let m = advanced_metrics(&trades);
        assert_eq!(m.gross_profit, Decimal::from(300));
        assert_eq!(m.gross_loss, Decimal::from(200));
        assert_eq!(m.net_profit, Decimal::from(100));
        assert_eq!(m.profit_factor, Decimal::new(15, 1));
        assert_eq!(m.avg_win, Decimal::from(150));
        assert_eq!(m.avg_loss, Decimal::from(100));
        assert_eq!(m.avg_rr_ratio, Decimal::new(15, 1));
        // 0.5 * 150 - 0.5 * 100 = 25
        assert_eq!(m.expectancy, Decimal::from(25));
    }

    #[test]
    fn test_all_zero_with_no_closed_trades() {
        let m = advanced_metrics(&[]);
        assert_eq!(m.profit_factor, Decimal::ZERO);
        assert_eq!(m.avg_win, Decimal::ZERO);
        assert_eq!(m.avg_loss, Decimal::ZERO);
        assert_eq!(m.avg_rr_ratio, Decimal::ZERO);
        assert_eq!(m.expectancy, Decimal::ZERO);
        assert_eq!(m.max_drawdown, Decimal::ZERO);
    }

    #[test]
    fn test_no_losses_zeroes_ratio_denominators() {
        let trades = vec![
            closed_trade("A", ts(1, 10), 1, 100),
            closed_trade("B", ts(2, 10), 1, 50),
        ];

        let m = advanced_metrics(&trades);
        assert_eq!(m.gross_loss, Decimal::ZERO);
        assert_eq!(m.profit_factor, Decimal::ZERO);
        assert_eq!(m.avg_rr_ratio, Decimal::ZERO);
        // Expectancy still defined: 1.0 * 75 - 0 * 0
        assert_eq!(m.expectancy, Decimal::from(75));
    }
}
