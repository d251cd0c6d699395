use rust_decimal::Decimal;

use crate::instruments;
use crate::models::Direction;

/// Profit/loss of a single closed trade. `profit_loss_percent` is None
/// when the cost basis is zero, never NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct PnL {
    pub profit_loss: Decimal,
    pub profit_loss_percent: Option<Decimal>,
}

/// Compute signed P&L for one trade.
///
/// The point difference runs with the trade for longs and against it for
/// shorts; the instrument's point value scales each point into dollars, so
/// equities (point value 1) and futures share the same arithmetic.
pub fn compute(
    symbol: &str,
    direction: Direction,
    entry_price: Decimal,
    exit_price: Decimal,
    quantity: i32,
    fees: Decimal,
) -> PnL {
    let point_value = instruments::point_value(symbol);
    let qty = Decimal::from(quantity);

    let point_diff = match direction {
        Direction::Long => exit_price - entry_price,
        Direction::Short => entry_price - exit_price,
    };

    let profit_loss = point_diff * qty * point_value - fees;

    let basis = entry_price * qty * point_value;
    let profit_loss_percent = if basis.is_zero() {
        None
    } else {
        Some(profit_loss / basis * Decimal::ONE_HUNDRED)
    };

    PnL {
        profit_loss,
        profit_loss_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_futures_with_point_value() {
        // NQ long: (15010 - 15000) * 2 * 20 - 5 = 395
        let pnl = compute(
            "NQ",
            Direction::Long,
            Decimal::from(15_000),
            Decimal::from(15_010),
            2,
            Decimal::from(5),
        );
        assert_eq!(pnl.profit_loss, Decimal::from(395));
    }

    #[test]
    fn test_short_inverts_sign() {
        // Short from 100 down to 90, qty 10, plain equity
        let pnl = compute(
            "XYZ",
            Direction::Short,
            Decimal::from(100),
            Decimal::from(90),
            10,
            Decimal::ZERO,
        );
        assert_eq!(pnl.profit_loss, Decimal::from(100));
    }

    #[test]
    fn test_losing_long() {
        let pnl = compute(
            "AAPL",
            Direction::Long,
            Decimal::from(150),
            Decimal::from(145),
            10,
            Decimal::from(2),
        );
        assert_eq!(pnl.profit_loss, Decimal::from(-52));
        assert!(pnl.profit_loss_percent.unwrap() < Decimal::ZERO);
    }

    #[test]
    fn test_percent_return() {
        // (155 - 150) * 100 / (150 * 100) * 100 = 3.333...%
        let pnl = compute(
            "AAPL",
            Direction::Long,
            Decimal::from(150),
            Decimal::from(155),
            100,
            Decimal::ZERO,
        );
        let pct = pnl.profit_loss_percent.unwrap();
        assert!(pct > Decimal::new(333, 2) && pct < Decimal::new(334, 2));
    }

    #[test]
    fn test_zero_basis_yields_none_not_nan() {
        let pnl = compute(
            "XYZ",
            Direction::Long,
            Decimal::ZERO,
            Decimal::from(10),
            1,
            Decimal::ZERO,
        );
        assert_eq!(pnl.profit_loss, Decimal::from(10));
        assert_eq!(pnl.profit_loss_percent, None);
    }

    #[test]
    fn test_fees_subtracted_after_scaling() {
        // Break-even move, only fees remain
        let pnl = compute(
            "ES",
            Direction::Long,
            Decimal::from(5000),
            Decimal::from(5000),
            3,
            Decimal::new(1050, 2),
        );
        assert_eq!(pnl.profit_loss, Decimal::new(-1050, 2));
    }
}
