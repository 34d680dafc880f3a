//! Close-strategy evaluator: derives follow-up orders when a leg fills, per
//! the trade's declared close type, and decides when a trade is done.
//!
//! A polymorphic capability — callers register the implementation that
//! matches the [`TradeCloseType`] their strategy selected. This module
//! provides the contract plus the handful of generic implementations every
//! strategy in this corpus composes from.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::application::ports::TradeCloseType;
use crate::domain::order_execution::aggregate::{Order, Trade};
use crate::domain::order_execution::value_objects::{OrderSide, OrderType};

/// Derives follow-up orders on a fill, and decides whether the trade is done.
pub trait CloseStrategyEvaluator: Send + Sync {
    /// Build the orders to emit now that `filled_order` has filled.
    ///
    /// Returns an empty vec if this fill doesn't call for a new order (e.g.
    /// the exit leg of a bracket just filled).
    fn derive_follow_up(&self, trade: &Trade, filled_order: &Order, at: DateTime<Utc>)
        -> Vec<Order>;

    /// Whether `trade` should be closed now that `filled_order` has filled.
    fn should_close(&self, trade: &Trade, filled_order: &Order) -> bool;
}

/// Closes the trade the moment the entry order fills; no exit leg.
///
/// Matches [`TradeCloseType::Market`].
pub struct CloseAtEntryFill;

impl CloseStrategyEvaluator for CloseAtEntryFill {
    fn derive_follow_up(&self, _: &Trade, _: &Order, _: DateTime<Utc>) -> Vec<Order> {
        Vec::new()
    }

    fn should_close(&self, _: &Trade, filled_order: &Order) -> bool {
        filled_order.order_side == OrderSide::Buy
    }
}

/// On entry BUY fill, emits a single SELL LIMIT exit at `entry_price +
/// offset`; closes the trade once that exit fills.
///
/// Matches [`TradeCloseType::FixedTakeProfit`].
pub struct FixedTakeProfit {
    /// Added to the entry fill price to derive the exit limit price.
    pub offset: Decimal,
}

impl CloseStrategyEvaluator for FixedTakeProfit {
    fn derive_follow_up(
        &self,
        trade: &Trade,
        filled_order: &Order,
        at: DateTime<Utc>,
    ) -> Vec<Order> {
        if filled_order.order_side != OrderSide::Buy {
            return Vec::new();
        }
        let Some(entry_price) = filled_order.price else {
            return Vec::new();
        };
        let Some(trade_id) = trade.trade_id else {
            return Vec::new();
        };
        vec![Order::new_pending(
            trade_id,
            OrderSide::Sell,
            OrderType::Limit,
            filled_order.qty,
            Some(entry_price + self.offset),
            None,
            at,
        )]
    }

    fn should_close(&self, _: &Trade, filled_order: &Order) -> bool {
        filled_order.order_side == OrderSide::Sell
    }
}

/// Select the built-in evaluator for a [`TradeCloseType`].
///
/// `take_profit_offset` is only consulted for [`TradeCloseType::FixedTakeProfit`]
/// and [`TradeCloseType::Bracket`]; the strategy owning the trade supplies it.
#[must_use]
pub fn evaluator_for(
    close_type: TradeCloseType,
    take_profit_offset: Decimal,
) -> Box<dyn CloseStrategyEvaluator> {
    match close_type {
        TradeCloseType::Market => Box::new(CloseAtEntryFill),
        TradeCloseType::FixedTakeProfit | TradeCloseType::Bracket => Box::new(FixedTakeProfit {
            offset: take_profit_offset,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order_execution::value_objects::TradeType;
    use crate::domain::shared::TradeId;
    use rust_decimal_macros::dec;

    fn trade() -> Trade {
        let mut t = Trade::new_pending("exec-1", TradeType::Long, "BASE", "QUOTE", Utc::now());
        t.trade_id = Some(TradeId::new(1));
        t
    }

    #[test]
    fn s3_fixed_take_profit_emits_sell_at_offset() {
        let trade = trade();
        let buy = Order::new_pending(
            TradeId::new(1),
            OrderSide::Buy,
            OrderType::Limit,
            dec!(1),
            Some(dec!(50)),
            None,
            Utc::now(),
        );
        let eval = FixedTakeProfit { offset: dec!(20) };
        let follow_up = eval.derive_follow_up(&trade, &buy, Utc::now());
        assert_eq!(follow_up.len(), 1);
        assert_eq!(follow_up[0].order_side, OrderSide::Sell);
        assert_eq!(follow_up[0].price, Some(dec!(70)));
        assert!(!eval.should_close(&trade, &buy));
    }

    #[test]
    fn fixed_take_profit_closes_on_sell_fill() {
        let trade = trade();
        let sell = Order::new_pending(
            TradeId::new(1),
            OrderSide::Sell,
            OrderType::Limit,
            dec!(1),
            Some(dec!(70)),
            None,
            Utc::now(),
        );
        let eval = FixedTakeProfit { offset: dec!(20) };
        assert!(eval.should_close(&trade, &sell));
        assert!(eval.derive_follow_up(&trade, &sell, Utc::now()).is_empty());
    }

    #[test]
    fn close_at_entry_fill_closes_on_buy() {
        let trade = trade();
        let buy = Order::new_pending(
            TradeId::new(1),
            OrderSide::Buy,
            OrderType::Market,
            dec!(1),
            None,
            None,
            Utc::now(),
        );
        let eval = CloseAtEntryFill;
        assert!(eval.should_close(&trade, &buy));
        assert!(eval.derive_follow_up(&trade, &buy, Utc::now()).is_empty());
    }
}
