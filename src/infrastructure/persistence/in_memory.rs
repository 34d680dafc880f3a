//! In-memory order/trade repositories.
//!
//! Suitable for tests and small deployments. A durable backend implements
//! the same `OrderRepository`/`TradeRepository` traits against a real
//! database; id generation there would come from the schema's sequence
//! rather than an in-process counter.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::application::ports::{OrderRepository, TradeRepository};
use crate::domain::order_execution::aggregate::{Order, Trade};
use crate::domain::order_execution::value_objects::OrderState;
use crate::domain::shared::TradeId;
use crate::error::EngineError;

/// In-memory `OrderRepository`.
///
/// Orders carry only `trade_id`, not the owning strategy execution, so
/// filtering by `strategy_exec_id` requires joining against the trade rows —
/// this adapter holds a reference to the trade repository for exactly that
/// join, mirroring the original's `TradeManager`, which keeps both tables in
/// one place.
#[derive(Debug)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<u64, Order>>,
    next_id: AtomicU64,
    trades: Arc<InMemoryTradeRepository>,
}

impl InMemoryOrderRepository {
    /// Create a new empty repository, joined against `trades` for
    /// `strategy_exec_id` lookups.
    #[must_use]
    pub fn new(trades: Arc<InMemoryTradeRepository>) -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            trades,
        }
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn add(&self, order: &mut Order) -> Result<(), EngineError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        order.order_id = Some(id.into());
        let mut orders = self.orders.write().unwrap();
        orders.insert(id, order.clone());
        Ok(())
    }

    async fn save(&self, order: &Order) -> Result<(), EngineError> {
        let id = order
            .order_id
            .ok_or_else(|| EngineError::Persistence("order has no id yet".to_string()))?
            .value();
        let mut orders = self.orders.write().unwrap();
        orders.insert(id, order.clone());
        Ok(())
    }

    async fn get_order(&self, int_order_ref: &str) -> Result<Order, EngineError> {
        let orders = self.orders.read().unwrap();
        orders
            .values()
            .find(|o| o.int_order_ref.as_deref() == Some(int_order_ref))
            .cloned()
            .ok_or_else(|| EngineError::NotFound(format!("order {int_order_ref}")))
    }

    async fn get_all_orders(
        &self,
        trade_id: Option<TradeId>,
        strategy_exec_id: Option<&str>,
        states: &[OrderState],
    ) -> Result<Vec<Order>, EngineError> {
        let exec_trade_ids = strategy_exec_id.map(|id| self.trades.trade_ids_for_exec(id));
        let orders = self.orders.read().unwrap();
        Ok(orders
            .values()
            .filter(|o| trade_id.map_or(true, |t| o.trade_id == t))
            .filter(|o| {
                exec_trade_ids
                    .as_ref()
                    .map_or(true, |ids| ids.contains(&o.trade_id.value()))
            })
            .filter(|o| states.is_empty() || states.contains(&o.order_state))
            .cloned()
            .collect())
    }

    async fn get_pending_orders(&self, trade_id: TradeId) -> Result<Vec<Order>, EngineError> {
        let orders = self.orders.read().unwrap();
        Ok(orders
            .values()
            .filter(|o| o.trade_id == trade_id && o.order_state.is_pending())
            .cloned()
            .collect())
    }
}

/// In-memory `TradeRepository`.
#[derive(Debug, Default)]
pub struct InMemoryTradeRepository {
    trades: RwLock<HashMap<u64, Trade>>,
    next_id: AtomicU64,
}

impl InMemoryTradeRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            trades: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Ids of every trade whose `strategy_exec_id` matches.
    #[must_use]
    pub fn trade_ids_for_exec(&self, strategy_exec_id: &str) -> Vec<u64> {
        self.trades
            .read()
            .unwrap()
            .values()
            .filter(|t| t.strategy_exec_id == strategy_exec_id)
            .filter_map(|t| t.trade_id.map(|id| id.value()))
            .collect()
    }
}

#[async_trait]
impl TradeRepository for InMemoryTradeRepository {
    async fn add(&self, trade: &mut Trade) -> Result<(), EngineError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        trade.trade_id = Some(id.into());
        let mut trades = self.trades.write().unwrap();
        trades.insert(id, trade.clone());
        Ok(())
    }

    async fn save(&self, trade: &Trade) -> Result<(), EngineError> {
        let id = trade
            .trade_id
            .ok_or_else(|| EngineError::Persistence("trade has no id yet".to_string()))?
            .value();
        let mut trades = self.trades.write().unwrap();
        trades.insert(id, trade.clone());
        Ok(())
    }

    async fn get_trade(&self, trade_id: TradeId) -> Result<Trade, EngineError> {
        let trades = self.trades.read().unwrap();
        trades
            .get(&trade_id.value())
            .cloned()
            .ok_or_else(|| EngineError::NotFound(format!("trade {trade_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order_execution::value_objects::{OrderSide, OrderType, TradeType};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn add_assigns_monotonic_ids() {
        let repo = InMemoryOrderRepository::new(Arc::new(InMemoryTradeRepository::new()));
        let mut a = Order::new_pending(
            TradeId::new(1),
            OrderSide::Buy,
            OrderType::Market,
            dec!(1),
            None,
            None,
            Utc::now(),
        );
        let mut b = a.clone();
        repo.add(&mut a).await.unwrap();
        repo.add(&mut b).await.unwrap();
        assert_eq!(a.order_id.unwrap().value(), 1);
        assert_eq!(b.order_id.unwrap().value(), 2);
    }

    #[tokio::test]
    async fn get_pending_orders_filters_by_state() {
        let repo = InMemoryOrderRepository::new(Arc::new(InMemoryTradeRepository::new()));
        let mut pending = Order::new_pending(
            TradeId::new(1),
            OrderSide::Buy,
            OrderType::Market,
            dec!(1),
            None,
            None,
            Utc::now(),
        );
        repo.add(&mut pending).await.unwrap();

        let mut filled = pending.clone();
        filled.order_id = None;
        filled.order_state = OrderState::Filled;
        repo.add(&mut filled).await.unwrap();

        let still_pending = repo.get_pending_orders(TradeId::new(1)).await.unwrap();
        assert_eq!(still_pending.len(), 1);
        assert_eq!(still_pending[0].order_state, OrderState::OpenPendingInt);
    }

    #[tokio::test]
    async fn get_all_orders_filters_by_strategy_exec_id() {
        let trade_repo = Arc::new(InMemoryTradeRepository::new());
        let order_repo = InMemoryOrderRepository::new(trade_repo.clone());

        let mut trade_a = Trade::new_pending("exec-a", TradeType::Long, "BASE", "QUOTE", Utc::now());
        trade_repo.add(&mut trade_a).await.unwrap();
        let mut trade_b = Trade::new_pending("exec-b", TradeType::Long, "BASE", "QUOTE", Utc::now());
        trade_repo.add(&mut trade_b).await.unwrap();

        let mut order_a = Order::new_pending(
            trade_a.trade_id.unwrap(),
            OrderSide::Buy,
            OrderType::Market,
            dec!(1),
            None,
            None,
            Utc::now(),
        );
        order_repo.add(&mut order_a).await.unwrap();
        let mut order_b = Order::new_pending(
            trade_b.trade_id.unwrap(),
            OrderSide::Buy,
            OrderType::Market,
            dec!(1),
            None,
            None,
            Utc::now(),
        );
        order_repo.add(&mut order_b).await.unwrap();

        let exec_a_orders = order_repo
            .get_all_orders(None, Some("exec-a"), &[])
            .await
            .unwrap();
        assert_eq!(exec_a_orders.len(), 1);
        assert_eq!(exec_a_orders[0].trade_id, trade_a.trade_id.unwrap());
    }

    #[tokio::test]
    async fn trade_repository_roundtrip() {
        let repo = InMemoryTradeRepository::new();
        let mut trade = Trade::new_pending("exec-1", TradeType::Long, "BASE", "QUOTE", Utc::now());
        repo.add(&mut trade).await.unwrap();
        let id = trade.trade_id.unwrap();

        let fetched = repo.get_trade(id).await.unwrap();
        assert_eq!(fetched.strategy_exec_id, "exec-1");
    }
}
