//! Order/Trade repository contract.
//!
//! A durable store with monotonic id generation and queries by state and by
//! execution id. The engine treats a single `add`+`flush` as the unit that
//! assigns an id; implementations are free to batch that however their
//! backing store wants, as long as the id is visible to the caller when the
//! call returns.

use crate::domain::order_execution::aggregate::{Order, Trade};
use crate::domain::order_execution::value_objects::OrderState;
use crate::domain::shared::TradeId;
use crate::error::EngineError;

/// Persistence for orders.
#[async_trait::async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a new order, assigning `order_id` (and, if still unset,
    /// `int_order_ref`) in the same transactional unit.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Persistence`] if the write fails.
    async fn add(&self, order: &mut Order) -> Result<(), EngineError>;

    /// Persist an update to an already-assigned order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Persistence`] if the write fails, or
    /// [`EngineError::Programming`]-equivalent [`EngineError::NotFound`] if
    /// the order was never added.
    async fn save(&self, order: &Order) -> Result<(), EngineError>;

    /// Look up an order by its stable client reference.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if no such order exists.
    async fn get_order(&self, int_order_ref: &str) -> Result<Order, EngineError>;

    /// Look up all orders for a trade and/or strategy execution, optionally
    /// filtered to a set of states.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Persistence`] if the query fails.
    async fn get_all_orders(
        &self,
        trade_id: Option<TradeId>,
        strategy_exec_id: Option<&str>,
        states: &[OrderState],
    ) -> Result<Vec<Order>, EngineError>;

    /// Orders belonging to `trade_id` whose state is in the pending set.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Persistence`] if the query fails.
    async fn get_pending_orders(&self, trade_id: TradeId) -> Result<Vec<Order>, EngineError>;
}

/// Persistence for trades.
#[async_trait::async_trait]
pub trait TradeRepository: Send + Sync {
    /// Persist a new trade, assigning `trade_id`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Persistence`] if the write fails.
    async fn add(&self, trade: &mut Trade) -> Result<(), EngineError>;

    /// Persist an update to an already-assigned trade.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Persistence`] if the write fails.
    async fn save(&self, trade: &Trade) -> Result<(), EngineError>;

    /// Look up a trade by id.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if no such trade exists.
    async fn get_trade(&self, trade_id: TradeId) -> Result<Trade, EngineError>;
}
