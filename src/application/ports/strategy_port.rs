//! Strategy callback contract.
//!
//! Strategies decide when to open trades and what orders to emit; the engine
//! only needs to notify them of closure and ask for the close-type policy to
//! apply on entry fill.

use crate::domain::shared::TradeId;

/// Close-type policy a strategy selects for a trade.
///
/// Consulted once, on the entry order's `FILLED` update, and handed to the
/// close-strategy evaluator to derive follow-up orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeCloseType {
    /// Close immediately at market once the entry fills.
    Market,
    /// Place a single fixed take-profit limit order once the entry fills.
    FixedTakeProfit,
    /// Place a bracket: take-profit limit plus stop-loss, first to fill closes the trade.
    Bracket,
}

/// Strategy-side callback the engine invokes on trade closure and consults
/// for close-type policy.
pub trait StrategyCallback: Send + Sync {
    /// Notify the strategy that `trade_id` has closed.
    fn trade_closed(&self, trade_id: TradeId);

    /// Ask the strategy which close-type policy to apply for a trade.
    fn get_trade_close_type(&self, trade_id: TradeId) -> TradeCloseType;
}
