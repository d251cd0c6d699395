use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::models::{AggregatedOrder, Direction, Fill};

/// Collapse raw executions into one logical order per `order_id`.
///
/// Quantities are summed as absolute values and the price is volume
/// weighted. Direction comes from the first fill's action; opposing fills
/// inside the same order are not reconciled into separate open/close legs.
/// Output order follows first appearance of each order_id in the input, so
/// a rerun over the same fill list aggregates identically.
pub fn aggregate_fills(fills: &[Fill]) -> Vec<AggregatedOrder> {
    let mut order_ids: Vec<i64> = Vec::new();
    let mut groups: HashMap<i64, Vec<&Fill>> = HashMap::new();

    for fill in fills {
        let entry = groups.entry(fill.order_id).or_default();
        if entry.is_empty() {
            order_ids.push(fill.order_id);
        }
        entry.push(fill);
    }

    let mut orders = Vec::with_capacity(order_ids.len());
    for order_id in order_ids {
        let group = &groups[&order_id];
        let first = group[0];

        let mut total_quantity = Decimal::ZERO;
        let mut total_value = Decimal::ZERO;
        let mut total_fees = Decimal::ZERO;
        let mut entry_time = first.timestamp;

        for fill in group {
            let qty = fill.qty.abs();
            total_quantity += qty;
            total_value += qty * fill.price;
            total_fees += fill.commission.unwrap_or(Decimal::ZERO);
            if fill.timestamp < entry_time {
                entry_time = fill.timestamp;
            }
        }

        if total_quantity.is_zero() {
            // Zero-quantity fills carry no tradeable volume; nothing to import.
            continue;
        }

        let direction = if first.action.eq_ignore_ascii_case("buy") {
            Direction::Long
        } else {
            Direction::Short
        };

        orders.push(AggregatedOrder {
            order_id,
            contract_id: first.contract_id,
            total_quantity,
            weighted_avg_price: total_value / total_quantity,
            total_fees,
            direction,
            entry_time,
        });
    }

    orders
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_fill(order_id: i64, qty: i64, price: i64, minute: u32) -> Fill {
        Fill {
            id: order_id * 100 + qty,
            order_id,
            contract_id: 7001,
            action: "Buy".into(),
            qty: Decimal::from(qty),
            price: Decimal::from(price),
            commission: None,
            timestamp: Utc.with_ymd_and_hms(2025, 3, 10, 14, minute, 0).unwrap(),
        }
    }

    #[test]
    fn test_volume_weighted_average() {
        let fills = vec![make_fill(1, 3, 100, 0), make_fill(1, 2, 110, 1)];
        let orders = aggregate_fills(&fills);

        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].total_quantity, Decimal::from(5));
        assert_eq!(orders[0].weighted_avg_price, Decimal::from(104));
    }

    #[test]
    fn test_groups_by_order_id_in_first_seen_order() {
        let fills = vec![
            make_fill(9, 1, 50, 0),
            make_fill(4, 2, 60, 1),
            make_fill(9, 1, 52, 2),
        ];
        let orders = aggregate_fills(&fills);

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].order_id, 9);
        assert_eq!(orders[0].total_quantity, Decimal::from(2));
        assert_eq!(orders[1].order_id, 4);
    }

    #[test]
    fn test_signed_quantities_use_absolute_value() {
        let mut sell = make_fill(2, 3, 200, 0);
        sell.action = "Sell".into();
        sell.qty = Decimal::from(-3);

        let orders = aggregate_fills(&[sell]);
        assert_eq!(orders[0].total_quantity, Decimal::from(3));
        assert_eq!(orders[0].direction, Direction::Short);
    }

    #[test]
    fn test_entry_time_is_earliest_fill() {
        let fills = vec![make_fill(3, 1, 100, 30), make_fill(3, 1, 101, 5)];
        let orders = aggregate_fills(&fills);
        assert_eq!(orders[0].entry_time.to_rfc3339(), "2025-03-10T14:05:00+00:00");
    }

    #[test]
    fn test_commissions_sum_with_missing_defaulting_to_zero() {
        let mut a = make_fill(5, 1, 100, 0);
        a.commission = Some(Decimal::new(125, 2));
        let b = make_fill(5, 1, 100, 1);

        let orders = aggregate_fills(&[a, b]);
        assert_eq!(orders[0].total_fees, Decimal::new(125, 2));
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_fills(&[]).is_empty());
    }
}
