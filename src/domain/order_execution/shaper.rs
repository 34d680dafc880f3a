//! Order shaper: quantises quantities and prices to the exchange-legal grid.
//!
//! `shape(v, minV, denom) = minV + denom * floor((v - minV) / denom)`, always
//! snapping down. Arithmetic is exact `Decimal`; no binary floating-point
//! rounding is permitted anywhere in this module.

use rust_decimal::Decimal;

use crate::domain::market_rules::SymbolRules;
use crate::domain::order_execution::aggregate::Order;

/// Snap a single value down to `min_val + n * denom` for the largest `n`
/// such that the result does not exceed `value`.
#[must_use]
pub fn shape_value(value: Decimal, min_val: Decimal, denom: Decimal) -> Decimal {
    let steps = ((value - min_val) / denom).floor();
    min_val + denom * steps
}

/// Shape every order's `qty`, `price` (if set), and `stop_price` (if set)
/// in place, against `rules`.
pub fn shape_orders(rules: &SymbolRules, orders: &mut [Order]) {
    for order in orders.iter_mut() {
        order.qty = shape_value(order.qty, rules.min_qty, rules.min_qty_denom);
        if let Some(price) = order.price {
            order.price = Some(shape_value(price, rules.min_price, rules.min_price_denom));
        }
        if let Some(stop_price) = order.stop_price {
            order.stop_price = Some(shape_value(
                stop_price,
                rules.min_price,
                rules.min_price_denom,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order_execution::value_objects::{OrderSide, OrderType};
    use crate::domain::shared::TradeId;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn rules() -> SymbolRules {
        SymbolRules {
            min_qty: dec!(0.1),
            max_qty: dec!(1000),
            min_qty_denom: dec!(0.1),
            min_price: dec!(1),
            max_price: dec!(1_000_000),
            min_price_denom: dec!(0.5),
            min_notional: dec!(10),
            base_asset_precision: 2,
            quote_asset_precision: 2,
        }
    }

    #[test]
    fn s1_shape_scenario() {
        // S1: qty=0.37, price=12.3 -> qty=0.3, price=12.0
        assert_eq!(shape_value(dec!(0.37), dec!(0.1), dec!(0.1)), dec!(0.3));
        assert_eq!(shape_value(dec!(12.3), dec!(1), dec!(0.5)), dec!(12.0));
    }

    #[test]
    fn shape_orders_mutates_in_place() {
        let rules = rules();
        let mut orders = vec![Order::new_pending(
            TradeId::new(1),
            OrderSide::Buy,
            OrderType::Limit,
            dec!(0.37),
            Some(dec!(12.3)),
            None,
            Utc::now(),
        )];
        shape_orders(&rules, &mut orders);
        assert_eq!(orders[0].qty, dec!(0.3));
        assert_eq!(orders[0].price, Some(dec!(12.0)));
    }

    #[test]
    fn shape_already_on_grid_is_identity() {
        assert_eq!(shape_value(dec!(0.3), dec!(0.1), dec!(0.1)), dec!(0.3));
    }
}
