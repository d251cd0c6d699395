use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{Direction, Trade, TradeCandidate, TradeDraft, TradeStatus};
use crate::pnl;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("a closed trade cannot be reopened by clearing exit_price")]
    WouldReopen,
}

/// Validate and coerce a raw draft into a persistable candidate.
///
/// Status policy: a trade is OPEN until an exit price is supplied and
/// CLOSED from then on; P&L is computed exactly when the exit price is
/// present. This is the single place that derives either.
pub fn normalize(draft: &TradeDraft) -> Result<TradeCandidate, ValidationError> {
    let symbol = draft
        .symbol
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ValidationError::MissingField("symbol"))?
        .to_uppercase();

    let direction_raw = draft
        .direction
        .as_deref()
        .ok_or(ValidationError::MissingField("direction"))?;
    let direction =
        Direction::parse(direction_raw).ok_or_else(|| ValidationError::InvalidField {
            field: "direction",
            reason: format!("expected LONG or SHORT, got {direction_raw:?}"),
        })?;

    let entry_time = draft
        .entry_time
        .ok_or(ValidationError::MissingField("entry_date"))?;

    let entry_price = draft
        .entry_price
        .ok_or(ValidationError::MissingField("entry_price"))?;
    if entry_price <= Decimal::ZERO {
        return Err(ValidationError::InvalidField {
            field: "entry_price",
            reason: format!("must be positive, got {entry_price}"),
        });
    }

    let quantity_raw = draft
        .quantity
        .ok_or(ValidationError::MissingField("quantity"))?;
    let quantity: i32 = if quantity_raw > 0 {
        i32::try_from(quantity_raw).map_err(|_| ValidationError::InvalidField {
            field: "quantity",
            reason: format!("{quantity_raw} is out of range"),
        })?
    } else {
        return Err(ValidationError::InvalidField {
            field: "quantity",
            reason: format!("must be a positive integer, got {quantity_raw}"),
        });
    };

    let fees = draft.fees.unwrap_or(Decimal::ZERO);
    if fees < Decimal::ZERO {
        return Err(ValidationError::InvalidField {
            field: "fees",
            reason: format!("must not be negative, got {fees}"),
        });
    }

    if let Some(exit_price) = draft.exit_price {
        if exit_price <= Decimal::ZERO {
            return Err(ValidationError::InvalidField {
                field: "exit_price",
                reason: format!("must be positive, got {exit_price}"),
            });
        }
    }

    let (status, profit_loss, profit_loss_percent) = match draft.exit_price {
        Some(exit_price) => {
            let pnl = pnl::compute(&symbol, direction, entry_price, exit_price, quantity, fees);
            (
                TradeStatus::Closed,
                Some(pnl.profit_loss),
                pnl.profit_loss_percent,
            )
        }
        None => (TradeStatus::Open, None, None),
    };

    Ok(TradeCandidate {
        symbol,
        direction,
        entry_time,
        exit_time: draft.exit_time,
        entry_price,
        exit_price: draft.exit_price,
        quantity,
        fees,
        stop_loss: draft.stop_loss,
        take_profit: draft.take_profit,
        strategy: draft.strategy.clone().filter(|s| !s.trim().is_empty()),
        notes: draft.notes.clone(),
        status,
        profit_loss,
        profit_loss_percent,
        external_id: None,
    })
}

/// There is no CLOSED→OPEN transition: reject a full-record update that
/// drops the exit price of an already-closed trade.
pub fn ensure_no_reopen(existing: &Trade, candidate: &TradeCandidate) -> Result<(), ValidationError> {
    if existing.exit_price.is_some() && candidate.exit_price.is_none() {
        return Err(ValidationError::WouldReopen);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// External-id derivation
// ---------------------------------------------------------------------------

/// Natural key for a CSV row: there is no broker-assigned id, so the
/// identifying fields themselves form the dedup key.
pub fn csv_external_id(candidate: &TradeCandidate) -> String {
    format!(
        "csv_{}_{}_{}_{}",
        candidate.symbol,
        candidate.entry_time.date_naive(),
        candidate.entry_price,
        candidate.quantity
    )
}

/// Broker orders already carry a stable order id.
pub fn broker_external_id(order_id: i64) -> String {
    format!("tradovate_{order_id}")
}
