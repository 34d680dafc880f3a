//! The central Trade/Order engine: owns transitions, the live cache, close
//! detection, and PnL calculation.
//!
//! Callers (strategy tick, exchange update handler, submission pass) must
//! serialise their invocations onto one executor — the engine holds no
//! internal locks and mutates its caches assuming single-threaded,
//! cooperative access, per the concurrency model this crate targets.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use crate::application::ports::{
    ExchangeClient, ExchangeResponse, OrderRepository, StrategyCallback, TradeRepository,
};
use crate::config::EngineConfig;
use crate::domain::market_rules::MarketRulesProvider;
use crate::domain::order_execution::aggregate::{Order, Trade};
use crate::domain::order_execution::close_strategy::evaluator_for;
use crate::domain::order_execution::value_objects::{OrderSide, OrderState, OrderType, TradeState, TradeType};
use crate::domain::order_execution::state_machine::is_valid_order_transition;
use crate::domain::order_execution::{shaper, validator};
use crate::domain::shared::{Candle, OrderId, TradeId};
use crate::error::EngineError;

/// The order and trade lifecycle engine.
pub struct Engine {
    order_repo: Arc<dyn OrderRepository>,
    trade_repo: Arc<dyn TradeRepository>,
    exchange: Arc<dyn ExchangeClient>,
    market_rules: Arc<dyn MarketRulesProvider>,
    strategy: Arc<dyn StrategyCallback>,
    config: EngineConfig,
    /// Default offset used by take-profit/bracket close-strategy evaluators.
    ///
    /// Real strategies supply their own evaluator via a richer
    /// [`crate::application::ports::StrategyCallback`] implementation; this
    /// is the fallback used when the engine resolves the built-in evaluators
    /// for a [`crate::application::ports::TradeCloseType`].
    take_profit_offset: Decimal,
    live_orders: HashMap<u64, Order>,
    live_trades: HashMap<u64, Trade>,
}

impl Engine {
    /// Build a new engine over its external collaborators.
    #[must_use]
    pub fn new(
        order_repo: Arc<dyn OrderRepository>,
        trade_repo: Arc<dyn TradeRepository>,
        exchange: Arc<dyn ExchangeClient>,
        market_rules: Arc<dyn MarketRulesProvider>,
        strategy: Arc<dyn StrategyCallback>,
        config: EngineConfig,
        take_profit_offset: Decimal,
    ) -> Self {
        Self {
            order_repo,
            trade_repo,
            exchange,
            market_rules,
            strategy,
            config,
            take_profit_offset,
            live_orders: HashMap::new(),
            live_trades: HashMap::new(),
        }
    }

    /// Write-through mirror of every non-terminal order, keyed by `order_id`.
    #[must_use]
    pub fn live_orders(&self) -> &HashMap<u64, Order> {
        &self.live_orders
    }

    /// Write-through mirror of every non-terminal trade, keyed by `trade_id`.
    #[must_use]
    pub fn live_trades(&self) -> &HashMap<u64, Trade> {
        &self.live_trades
    }

    /// Clear both caches. Does not touch persisted state.
    pub fn reset(&mut self) {
        self.live_orders.clear();
        self.live_trades.clear();
    }

    /// Create a trade in `OPEN_PENDING`, `init_tmstmp = candle.close_time`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Persistence`] if the repository write fails.
    #[instrument(skip(self, candle))]
    pub async fn open_trade(
        &mut self,
        strategy_exec_id: &str,
        trade_type: TradeType,
        candle: &Candle,
    ) -> Result<Trade, EngineError> {
        let mut trade = Trade::new_pending(
            strategy_exec_id,
            trade_type,
            candle.base_asset(),
            candle.quote_asset(),
            candle.close_time,
        );
        self.persist_trade(&mut trade).await?;
        info!(trade_id = ?trade.trade_id, "trade OPEN_PENDING");
        Ok(trade)
    }

    /// Shape, validate, and persist `orders` against `trade`, in
    /// `OPEN_PENDING_INT`. Writes the assigned `order_id` back onto each
    /// caller-supplied order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RuleViolation`] or
    /// [`EngineError::ImmediateExecutionRisk`] if shaping/validation fails
    /// (nothing is persisted in that case), or [`EngineError::Persistence`]
    /// if a repository write fails.
    #[instrument(skip(self, candle, orders))]
    pub async fn open_order(
        &mut self,
        trade: &Trade,
        candle: &Candle,
        orders: &mut [Order],
    ) -> Result<(), EngineError> {
        debug!(count = orders.len(), "orders to be created");

        let rules = self
            .market_rules
            .get_symbol_rules(candle.base_asset(), candle.quote_asset())?;

        if self.config.shape_new_orders {
            shaper::shape_orders(&rules, orders);
        }
        if self.config.validate_orders {
            for order in orders.iter() {
                validator::validate_structural(&rules, order)?;
            }
        }
        if self.config.prevent_immediate_limit_order {
            for order in orders.iter() {
                validator::validate_immediate_execution(order, candle.close)?;
            }
        }

        let trade_id = trade
            .trade_id
            .ok_or_else(|| EngineError::Programming {
                order_id: 0,
                state: OrderState::OpenPendingInt,
            })?;

        for order in orders.iter_mut() {
            order.trade_id = trade_id;
            if order.order_type.is_market() {
                order.price = Some(candle.close);
            }
            order.order_state = OrderState::OpenPendingInt;
            order.init_tmstmp = candle.close_time;
            order.lst_upd_tmstmp = candle.close_time;

            self.persist_order(order).await?;
            info!(order_id = ?order.order_id, side = ?order.order_side, "order OPEN_PENDING_INT");
        }

        Ok(())
    }

    /// Drain every `OPEN_PENDING_INT`/`CANCEL_PENDING_INT` order for
    /// `strategy_exec_id` to the exchange, ascending by `order_id`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ExchangeTransport`] or
    /// [`EngineError::ExchangeRejection`] on the first order that fails to
    /// submit (that order is advanced to a terminal failure state and
    /// persisted before the error is returned); [`EngineError::Programming`]
    /// if an order in the queue is in a state submission doesn't cover.
    #[instrument(skip(self))]
    pub async fn send_orders(&mut self, strategy_exec_id: &str) -> Result<(), EngineError> {
        let mut pending = self
            .order_repo
            .get_all_orders(
                None,
                Some(strategy_exec_id),
                &[OrderState::OpenPendingInt, OrderState::CancelPendingInt],
            )
            .await?;
        pending.sort_by_key(|o| o.order_id.map(OrderId::value).unwrap_or(u64::MAX));

        for mut order in pending {
            match order.order_state {
                OrderState::OpenPendingInt => self.submit_open(&mut order).await?,
                OrderState::CancelPendingInt => self.submit_cancel(&mut order).await?,
                other => {
                    return Err(EngineError::Programming {
                        order_id: order.order_id.map(OrderId::value).unwrap_or(0),
                        state: other,
                    });
                }
            }
        }
        Ok(())
    }

    async fn submit_open(&mut self, order: &mut Order) -> Result<(), EngineError> {
        let trade = self.trade_repo.get_trade(order.trade_id).await?;
        let rules = self
            .market_rules
            .get_symbol_rules(&trade.base_asset, &trade.quote_asset)?;
        let int_order_ref = order
            .int_order_ref
            .clone()
            .ok_or_else(|| EngineError::Programming {
                order_id: order.order_id.map(OrderId::value).unwrap_or(0),
                state: order.order_state,
            })?;

        let qty_str = format_decimal(order.qty, rules.base_asset_precision);
        let price_str = order.price.map(|p| format_decimal(p, rules.quote_asset_precision));
        let stop_str = order
            .stop_price
            .map(|p| format_decimal(p, rules.quote_asset_precision));

        let result = self
            .exchange
            .create_order(
                order.order_side,
                order.order_type,
                &trade.base_asset,
                &trade.quote_asset,
                &qty_str,
                stop_str.as_deref(),
                price_str.as_deref(),
                &int_order_ref,
            )
            .await
            .and_then(|response| accept_open_response(response));

        match result {
            Ok(response) => {
                if order.order_type.is_market() {
                    order.price = response.price;
                }
                order.ext_order_ref = Some(response.ext_order_ref);
                order.order_state = OrderState::OpenPendingExt;
                self.persist_order(order).await?;
                info!(order_id = ?order.order_id, "order OPEN_PENDING_EXT");
                Ok(())
            }
            Err(err) => {
                warn!(order_id = ?order.order_id, %err, "order submission failed");
                order.order_state = OrderState::OpenFailed;
                self.persist_order(order).await?;
                Err(err)
            }
        }
    }

    async fn submit_cancel(&mut self, order: &mut Order) -> Result<(), EngineError> {
        let trade = self.trade_repo.get_trade(order.trade_id).await?;
        let int_order_ref = order
            .int_order_ref
            .clone()
            .ok_or_else(|| EngineError::Programming {
                order_id: order.order_id.map(OrderId::value).unwrap_or(0),
                state: order.order_state,
            })?;

        let result = self
            .exchange
            .cancel_order(&trade.base_asset, &trade.quote_asset, &int_order_ref)
            .await
            .and_then(accept_cancel_response);

        match result {
            Ok(response) => {
                order.ext_order_ref = Some(response.ext_order_ref);
                order.order_state = OrderState::CancelPendingExt;
                self.persist_order(order).await?;
                info!(order_id = ?order.order_id, "order CANCEL_PENDING_EXT");
                Ok(())
            }
            Err(err) => {
                warn!(order_id = ?order.order_id, %err, "order cancellation failed");
                order.order_state = OrderState::CancelFailed;
                self.persist_order(order).await?;
                Err(err)
            }
        }
    }

    /// Apply an exchange update: advance the order, re-evaluate the trade,
    /// and run the close-strategy evaluator on a fill.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnsupportedTradeType`] without persisting
    /// anything if the trade is `SHORT`. Returns [`EngineError::IllegalTransition`],
    /// also without persisting anything, if `response.order_state` is not a
    /// legal successor of the order's current state per
    /// [`crate::domain::order_execution::state_machine::ORDER_TRANSITIONS`]
    /// (a repeat of the order's current state is always accepted as a
    /// no-op). Otherwise returns [`EngineError::NotFound`]/[`EngineError::Persistence`]
    /// on repository failures.
    #[instrument(skip(self, response))]
    pub async fn process_order_update(
        &mut self,
        response: &ExchangeResponse,
    ) -> Result<(), EngineError> {
        let mut order = self.order_repo.get_order(&response.client_order_id).await?;
        let mut trade = self.trade_repo.get_trade(order.trade_id).await?;

        if trade.trade_type != TradeType::Long {
            return Err(EngineError::UnsupportedTradeType(trade.trade_type));
        }

        if response.order_state != order.order_state
            && !is_valid_order_transition(order.order_state, response.order_state)
        {
            return Err(EngineError::IllegalTransition {
                order_id: order.order_id.map(OrderId::value).unwrap_or(0),
                from: order.order_state,
                to: response.order_state,
            });
        }

        let at = response.order_tmstmp;
        order.lst_upd_tmstmp = at;
        if response.order_state == OrderState::Opened {
            order.mark_opened(at);
        } else {
            order.order_state = response.order_state;
        }
        if response.order_state == OrderState::Filled {
            debug!(order_id = ?order.order_id, "order FILLED");
            order.filled_tmstmp = Some(at);
        }

        self.persist_order(&mut order).await?;

        match response.order_state {
            OrderState::Opened
                if response.order_side == OrderSide::Buy
                    && trade.trade_state == TradeState::OpenPending =>
            {
                trade.mark_opened(at);
                info!(trade_id = ?trade.trade_id, "trade OPENED");
            }
            OrderState::Canceled | OrderState::Rejected | OrderState::Expired => {
                let trade_id = trade.trade_id.expect("persisted trade has an id");
                let still_pending = self.order_repo.get_pending_orders(trade_id).await?;
                if still_pending.is_empty() {
                    self.close_trade(&mut trade, at).await?;
                }
            }
            OrderState::Filled => {
                let close_type = self
                    .strategy
                    .get_trade_close_type(trade.trade_id.expect("persisted trade has an id"));
                let evaluator = evaluator_for(close_type, self.take_profit_offset);

                let mut follow_up = evaluator.derive_follow_up(&trade, &order, at);
                if !follow_up.is_empty() {
                    let synthetic_close = response.price.or(order.price).unwrap_or(order.qty);
                    let candle = Candle {
                        symbol: crate::domain::shared::SymbolPair::new(
                            trade.base_asset.clone(),
                            trade.quote_asset.clone(),
                        ),
                        close: synthetic_close,
                        close_time: at,
                    };
                    self.open_order(&trade, &candle, &mut follow_up).await?;
                }

                if evaluator.should_close(&trade, &order) {
                    self.close_trade(&mut trade, at).await?;
                }
            }
            _ => {}
        }

        self.persist_trade(&mut trade).await?;
        Ok(())
    }

    /// Close `trade`, notify the strategy, and compute + log realised PnL.
    ///
    /// Does not itself persist `trade`; callers persist after mutating
    /// further (matches `processOrderUpdate`'s persist-order-then-trade
    /// ordering).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Persistence`] if the FILLED-orders query fails.
    #[instrument(skip(self))]
    pub async fn close_trade(
        &mut self,
        trade: &mut Trade,
        at: DateTime<Utc>,
    ) -> Result<Decimal, EngineError> {
        trade.trade_state = TradeState::Closed;
        trade.close_tmstmp = Some(at);

        let trade_id = trade.trade_id.expect("persisted trade has an id");
        self.strategy.trade_closed(trade_id);

        let pnl = self.calc_trade_pnl(trade_id).await?;
        log_pnl(trade_id, pnl);

        Ok(pnl)
    }

    async fn calc_trade_pnl(&self, trade_id: TradeId) -> Result<Decimal, EngineError> {
        let filled = self
            .order_repo
            .get_all_orders(Some(trade_id), None, &[OrderState::Filled])
            .await?;

        let mut buy = Decimal::ZERO;
        let mut sell = Decimal::ZERO;
        for order in &filled {
            let Some(price) = order.price else { continue };
            match order.order_side {
                OrderSide::Buy => buy += order.qty * price,
                OrderSide::Sell => sell += order.qty * price,
            }
        }
        Ok(sell - buy)
    }

    async fn persist_order(&mut self, order: &mut Order) -> Result<(), EngineError> {
        if order.order_id.is_none() {
            self.order_repo.add(order).await?;
            if order.int_order_ref.is_none() {
                if let Some(id) = order.order_id {
                    order.int_order_ref =
                        Some(format!("{}{}", self.config.order_reference_prefix, id.value()));
                    self.order_repo.save(order).await?;
                }
            }
        } else {
            self.order_repo.save(order).await?;
        }

        if let Some(id) = order.order_id {
            self.live_orders.insert(id.value(), order.clone());
        }
        Ok(())
    }

    async fn persist_trade(&mut self, trade: &mut Trade) -> Result<(), EngineError> {
        if trade.trade_id.is_none() {
            self.trade_repo.add(trade).await?;
        } else {
            self.trade_repo.save(trade).await?;
        }

        let id = trade.trade_id.expect("add assigns an id").value();
        if trade.trade_state.is_terminal() {
            self.live_trades.remove(&id);
            self.live_orders.retain(|_, o| o.trade_id.value() != id);
        } else {
            self.live_trades.insert(id, trade.clone());
        }
        Ok(())
    }
}

fn accept_open_response(response: ExchangeResponse) -> Result<ExchangeResponse, EngineError> {
    match response.order_state {
        OrderState::Opened | OrderState::Filled => Ok(response),
        other => Err(EngineError::ExchangeRejection {
            expected: vec![OrderState::Opened, OrderState::Filled],
            actual: other,
        }),
    }
}

fn accept_cancel_response(response: ExchangeResponse) -> Result<ExchangeResponse, EngineError> {
    match response.order_state {
        OrderState::Opened => Ok(response),
        other => Err(EngineError::ExchangeRejection {
            expected: vec![OrderState::Opened],
            actual: other,
        }),
    }
}

fn format_decimal(value: Decimal, precision: u32) -> String {
    format!("{:.*}", precision as usize, value)
}

/// ANSI-colour the realised PnL the way the source platform's CLI does:
/// green for non-negative, red for negative.
fn log_pnl(trade_id: TradeId, pnl: Decimal) {
    const GREEN: &str = "\x1b[1;32m";
    const RED: &str = "\x1b[1;31m";
    const RESET: &str = "\x1b[0m";
    let color = if pnl.is_sign_negative() { RED } else { GREEN };
    info!("trade {trade_id} CLOSED. {color}Gain: {pnl}{RESET}");
}
