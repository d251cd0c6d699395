use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use tradebook::models::Trade;

#[allow(dead_code)]
pub fn ts(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap()
}

/// A closed trade with the given realized P&L, held for `hold_hours`.
#[allow(dead_code)]
pub fn closed_trade(symbol: &str, entry: DateTime<Utc>, hold_hours: i64, pl: i64) -> Trade {
    Trade {
        id: Uuid::new_v4(),
        symbol: symbol.into(),
        direction: "LONG".into(),
        entry_time: entry,
        exit_time: Some(entry + Duration::hours(hold_hours)),
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

#[allow(dead_code)]
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
