//! Scenario tests exercising the engine end to end against an in-memory
//! repository and a scripted exchange client.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex as StdMutex};

use chrono::Utc;
use lifecycle_engine::application::ports::{
    ExchangeClient, ExchangeResponse, OrderRepository, StrategyCallback, TradeCloseType,
};
use lifecycle_engine::domain::market_rules::{MarketRulesProvider, SymbolRules};
use lifecycle_engine::domain::order_execution::aggregate::Order;
use lifecycle_engine::domain::order_execution::value_objects::{
    OrderSide, OrderState, OrderType, TradeType,
};
use lifecycle_engine::domain::order_execution::Engine;
use lifecycle_engine::domain::shared::{Candle, SymbolPair, TradeId};
use lifecycle_engine::error::EngineError;
use lifecycle_engine::infrastructure::persistence::in_memory::{
    InMemoryOrderRepository, InMemoryTradeRepository,
};
use lifecycle_engine::EngineConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

struct FixedRules(SymbolRules);

impl MarketRulesProvider for FixedRules {
    fn get_symbol_rules(&self, _: &str, _: &str) -> Result<SymbolRules, EngineError> {
        Ok(self.0)
    }
}

fn rules() -> SymbolRules {
    SymbolRules {
        min_qty: dec!(0.01),
        max_qty: dec!(1000),
        min_qty_denom: dec!(0.01),
        min_price: dec!(1),
        max_price: dec!(1_000_000),
        min_price_denom: dec!(0.01),
        min_notional: dec!(1),
        base_asset_precision: 4,
        quote_asset_precision: 2,
    }
}

struct NullStrategy(TradeCloseType);

impl StrategyCallback for NullStrategy {
    fn trade_closed(&self, _: TradeId) {}
    fn get_trade_close_type(&self, _: TradeId) -> TradeCloseType {
        self.0
    }
}

/// Replies with a queued script of responses, FIFO, regardless of which
/// method is called; tests queue exactly the responses each step needs.
struct ScriptedExchange {
    responses: StdMutex<Vec<Result<ExchangeResponse, EngineError>>>,
}

impl ScriptedExchange {
    fn new(responses: Vec<Result<ExchangeResponse, EngineError>>) -> Self {
        Self {
            responses: StdMutex::new(responses),
        }
    }
}

#[async_trait::async_trait]
impl ExchangeClient for ScriptedExchange {
    async fn create_order(
        &self,
        _side: OrderSide,
        _order_type: OrderType,
        _base_asset: &str,
        _quote_asset: &str,
        _qty: &str,
        _stop_price: Option<&str>,
        _price: Option<&str>,
        client_order_id: &str,
    ) -> Result<ExchangeResponse, EngineError> {
        next_response(&self.responses, client_order_id)
    }

    async fn cancel_order(
        &self,
        _base_asset: &str,
        _quote_asset: &str,
        client_order_id: &str,
    ) -> Result<ExchangeResponse, EngineError> {
        next_response(&self.responses, client_order_id)
    }
}

fn next_response(
    responses: &StdMutex<Vec<Result<ExchangeResponse, EngineError>>>,
    client_order_id: &str,
) -> Result<ExchangeResponse, EngineError> {
    let mut responses = responses.lock().unwrap();
    assert!(!responses.is_empty(), "exchange script exhausted");
    let mut r = responses.remove(0)?;
    r.client_order_id = client_order_id.to_string();
    Ok(r)
}

fn opened_response(price: Decimal) -> Result<ExchangeResponse, EngineError> {
    Ok(ExchangeResponse {
        order_state: OrderState::Opened,
        order_side: OrderSide::Buy,
        order_tmstmp: Utc::now(),
        price: Some(price),
        ext_order_ref: "ext-1".to_string(),
        client_order_id: String::new(),
        raw_data: serde_json::Value::Null,
    })
}

fn fill_update(client_order_id: &str, side: OrderSide, price: Decimal) -> ExchangeResponse {
    ExchangeResponse {
        order_state: OrderState::Filled,
        order_side: side,
        order_tmstmp: Utc::now(),
        price: Some(price),
        ext_order_ref: "ext-1".to_string(),
        client_order_id: client_order_id.to_string(),
        raw_data: serde_json::Value::Null,
    }
}

fn candle(close: Decimal) -> Candle {
    Candle {
        symbol: SymbolPair::new("BASE", "QUOTE"),
        close,
        close_time: Utc::now(),
    }
}

#[allow(clippy::type_complexity)]
fn engine(
    strategy: TradeCloseType,
    script: Vec<Result<ExchangeResponse, EngineError>>,
) -> (
    Engine,
    Arc<InMemoryOrderRepository>,
    Arc<InMemoryTradeRepository>,
) {
    let trade_repo = Arc::new(InMemoryTradeRepository::new());
    let order_repo = Arc::new(InMemoryOrderRepository::new(trade_repo.clone()));
    let exchange = Arc::new(ScriptedExchange::new(script));
    let engine = Engine::new(
        order_repo.clone(),
        trade_repo.clone(),
        exchange,
        Arc::new(FixedRules(rules())),
        Arc::new(NullStrategy(strategy)),
        EngineConfig::default(),
        dec!(20),
    );
    (engine, order_repo, trade_repo)
}

#[tokio::test]
async fn s3_happy_path_open_fill_close_computes_pnl() {
    let (mut eng, _orders, _trades) = engine(
        TradeCloseType::FixedTakeProfit,
        vec![opened_response(dec!(100)), opened_response(dec!(120))],
    );

    let c = candle(dec!(100));
    let trade = eng.open_trade("exec-1", TradeType::Long, &c).await.unwrap();
    let mut entry = vec![Order::new_pending(
        trade.trade_id.unwrap(),
        OrderSide::Buy,
        OrderType::Market,
        dec!(1),
        None,
        None,
        c.close_time,
    )];
    eng.open_order(&trade, &c, &mut entry).await.unwrap();
    eng.send_orders("exec-1").await.unwrap();

    let entry_ref = eng
        .live_orders()
        .values()
        .find(|o| o.trade_id == trade.trade_id.unwrap())
        .unwrap()
        .int_order_ref
        .clone()
        .unwrap();

    // entry fills at 100; the FixedTakeProfit evaluator (offset=20) should
    // emit a follow-up SELL LIMIT at 120 and leave the trade open.
    eng.process_order_update(&fill_update(&entry_ref, OrderSide::Buy, dec!(100)))
        .await
        .unwrap();

    let exit = eng
        .live_orders()
        .values()
        .find(|o| o.order_side == OrderSide::Sell)
        .cloned()
        .expect("take-profit exit order should have been derived");
    assert_eq!(exit.price, Some(dec!(120)));
    assert_eq!(exit.order_state, OrderState::OpenPendingInt);
    assert!(eng.live_trades().contains_key(&trade.trade_id.unwrap().value()));

    // submit the derived exit leg before the exchange can report it FILLED —
    // OPEN_PENDING_INT -> FILLED is not a transition the order state machine allows.
    eng.send_orders("exec-1").await.unwrap();

    let exit_ref = eng
        .live_orders()
        .values()
        .find(|o| o.order_side == OrderSide::Sell)
        .unwrap()
        .int_order_ref
        .clone()
        .unwrap();
    eng.process_order_update(&fill_update(&exit_ref, OrderSide::Sell, dec!(120)))
        .await
        .unwrap();

    // the trade closed: evicted from the live cache, both legs' cache rows gone too.
    assert!(!eng.live_trades().contains_key(&trade.trade_id.unwrap().value()));
    assert!(eng.live_orders().is_empty());
}

#[tokio::test]
async fn s4_cancellation_with_no_other_pending_closes_trade() {
    // the order state machine only reaches CANCELED via CANCEL_PENDING_INT ->
    // CANCEL_PENDING_EXT -> CANCELED, so this drives the order through OPENED
    // first, then simulates an externally-requested cancel the way a caller
    // outside process_order_update would (there is no exchange update that
    // itself asks for a cancel).
    let (mut eng, order_repo, _trades) = engine(
        TradeCloseType::Market,
        vec![opened_response(dec!(40)), opened_response(dec!(40))],
    );

    let c = candle(dec!(50));
    let trade = eng.open_trade("exec-1", TradeType::Long, &c).await.unwrap();
    let mut entry = vec![Order::new_pending(
        trade.trade_id.unwrap(),
        OrderSide::Buy,
        OrderType::Limit,
        dec!(1),
        Some(dec!(40)),
        None,
        c.close_time,
    )];
    eng.open_order(&trade, &c, &mut entry).await.unwrap();
    eng.send_orders("exec-1").await.unwrap();

    let client_order_id = entry[0].int_order_ref.clone().unwrap();
    eng.process_order_update(&ExchangeResponse {
        order_state: OrderState::Opened,
        order_side: OrderSide::Buy,
        order_tmstmp: Utc::now(),
        price: Some(dec!(40)),
        ext_order_ref: "ext-1".to_string(),
        client_order_id: client_order_id.clone(),
        raw_data: serde_json::Value::Null,
    })
    .await
    .unwrap();

    let mut order = order_repo.get_order(&client_order_id).await.unwrap();
    order.order_state = OrderState::CancelPendingInt;
    order_repo.save(&order).await.unwrap();

    eng.send_orders("exec-1").await.unwrap();

    eng.process_order_update(&ExchangeResponse {
        order_state: OrderState::Canceled,
        order_side: OrderSide::Buy,
        order_tmstmp: Utc::now(),
        price: None,
        ext_order_ref: "ext-1".to_string(),
        client_order_id,
        raw_data: serde_json::Value::Null,
    })
    .await
    .unwrap();

    assert!(!eng.live_trades().contains_key(&trade.trade_id.unwrap().value()));
}

#[tokio::test]
async fn s5_submission_failure_leaves_open_failed_and_reraises() {
    let (mut eng, order_repo, _trades) = engine(
        TradeCloseType::Market,
        vec![Err(EngineError::ExchangeTransport("network down".to_string()))],
    );

    let c = candle(dec!(50));
    let trade = eng.open_trade("exec-1", TradeType::Long, &c).await.unwrap();
    let mut entry = vec![Order::new_pending(
        trade.trade_id.unwrap(),
        OrderSide::Buy,
        OrderType::Market,
        dec!(1),
        None,
        None,
        c.close_time,
    )];
    eng.open_order(&trade, &c, &mut entry).await.unwrap();

    let result = eng.send_orders("exec-1").await;
    assert!(matches!(result, Err(EngineError::ExchangeTransport(_))));

    let persisted = order_repo
        .get_all_orders(Some(trade.trade_id.unwrap()), None, &[])
        .await
        .unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].order_state, OrderState::OpenFailed);
}

#[tokio::test]
async fn s6_short_trade_rejected_without_committing_order_update() {
    let (mut eng, order_repo, _trades) = engine(TradeCloseType::Market, vec![]);

    let c = candle(dec!(50));
    let trade = eng.open_trade("exec-1", TradeType::Short, &c).await.unwrap();
    let mut entry = vec![Order::new_pending(
        trade.trade_id.unwrap(),
        OrderSide::Sell,
        OrderType::Limit,
        dec!(1),
        Some(dec!(60)),
        None,
        c.close_time,
    )];
    eng.open_order(&trade, &c, &mut entry).await.unwrap();
    let client_order_id = entry[0].int_order_ref.clone().unwrap();

    let result = eng
        .process_order_update(&ExchangeResponse {
            order_state: OrderState::Opened,
            order_side: OrderSide::Sell,
            order_tmstmp: Utc::now(),
            price: None,
            ext_order_ref: "ext-1".to_string(),
            client_order_id,
            raw_data: serde_json::Value::Null,
        })
        .await;

    assert!(matches!(result, Err(EngineError::UnsupportedTradeType(TradeType::Short))));

    let persisted = order_repo
        .get_all_orders(Some(trade.trade_id.unwrap()), None, &[])
        .await
        .unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(
        persisted[0].order_state,
        OrderState::OpenPendingInt,
        "the order row from open_order must not be clobbered by the rejected update"
    );
}
