//! Order validator: structural validation and the immediate-execution guard.

use rust_decimal::Decimal;

use crate::domain::market_rules::SymbolRules;
use crate::domain::order_execution::aggregate::Order;
use crate::domain::order_execution::value_objects::{OrderSide, OrderType};
use crate::error::EngineError;

/// Structurally validate one order against `rules`.
///
/// Checks, in order, and names the first predicate violated: `qty` bounds,
/// `qty` denomination, `price` bounds/denomination/notional (if set), and
/// `stop_price` bounds/denomination/notional (if set).
///
/// # Errors
///
/// Returns [`EngineError::RuleViolation`] naming the first predicate violated.
pub fn validate_structural(rules: &SymbolRules, order: &Order) -> Result<(), EngineError> {
    if order.qty < rules.min_qty {
        return Err(EngineError::RuleViolation(format!(
            "qty {} is less than minQty {}",
            order.qty, rules.min_qty
        )));
    }
    if order.qty > rules.max_qty {
        return Err(EngineError::RuleViolation(format!(
            "qty {} is greater than maxQty {}",
            order.qty, rules.max_qty
        )));
    }
    if !on_grid(order.qty, rules.min_qty, rules.min_qty_denom) {
        return Err(EngineError::RuleViolation(format!(
            "qty {} is not a multiple of minQtyDenom {} above minQty {}",
            order.qty, rules.min_qty_denom, rules.min_qty
        )));
    }

    if let Some(price) = order.price {
        validate_price_like(rules, price, order.qty, "price")?;
    }

    if let Some(stop_price) = order.stop_price {
        validate_price_like(rules, stop_price, order.qty, "stop_price")?;
    }

    Ok(())
}

fn validate_price_like(
    rules: &SymbolRules,
    value: Decimal,
    qty: Decimal,
    label: &str,
) -> Result<(), EngineError> {
    if value < rules.min_price {
        return Err(EngineError::RuleViolation(format!(
            "{label} {value} is less than minPrice {}",
            rules.min_price
        )));
    }
    if value > rules.max_price {
        return Err(EngineError::RuleViolation(format!(
            "{label} {value} is greater than maxPrice {}",
            rules.max_price
        )));
    }
    if !on_grid(value, rules.min_price, rules.min_price_denom) {
        return Err(EngineError::RuleViolation(format!(
            "{label} {value} is not a multiple of minPriceDenom {} above minPrice {}",
            rules.min_price_denom, rules.min_price
        )));
    }
    if value * qty < rules.min_notional {
        return Err(EngineError::RuleViolation(format!(
            "{label} {value} * qty {qty} is less than minNotional {}",
            rules.min_notional
        )));
    }
    Ok(())
}

fn on_grid(value: Decimal, min_val: Decimal, denom: Decimal) -> bool {
    (value - min_val) % denom == Decimal::ZERO
}

/// Reject limit-style orders whose marketable side would cross immediately
/// against the current candle close `close`.
///
/// # Errors
///
/// Returns [`EngineError::ImmediateExecutionRisk`] if the order would execute
/// the moment it reached the book.
pub fn validate_immediate_execution(order: &Order, close: Decimal) -> Result<(), EngineError> {
    let risky = match (order.order_side, order.order_type) {
        (OrderSide::Buy, OrderType::Limit) => order.price.is_some_and(|p| p >= close),
        (OrderSide::Buy, t) if t.is_stop_style() && is_stop_loss(t) => {
            order.stop_price.is_some_and(|sp| sp <= close)
        }
        (OrderSide::Buy, t) if t.is_stop_style() => order.stop_price.is_some_and(|sp| sp >= close),
        (OrderSide::Sell, OrderType::Limit) => order.price.is_some_and(|p| p <= close),
        (OrderSide::Sell, t) if t.is_stop_style() && is_stop_loss(t) => {
            order.stop_price.is_some_and(|sp| sp >= close)
        }
        (OrderSide::Sell, t) if t.is_stop_style() => {
            order.stop_price.is_some_and(|sp| sp <= close)
        }
        _ => false,
    };

    if risky {
        Err(EngineError::ImmediateExecutionRisk(format!(
            "{:?} {:?} order would execute immediately against candle close {close}",
            order.order_side, order.order_type
        )))
    } else {
        Ok(())
    }
}

fn is_stop_loss(order_type: OrderType) -> bool {
    matches!(
        order_type,
        OrderType::StopLossLimit | OrderType::StopLossMarket
    )
}
