//! Exchange client contract.
//!
//! Opaque submission/cancel interface. Implementations live in infrastructure
//! adapters (REST, websocket); this crate only defines the shape.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::order_execution::value_objects::{OrderSide, OrderState};
use crate::error::EngineError;

/// A normalised exchange response to `createOrder`/`cancelOrder`.
#[derive(Debug, Clone)]
pub struct ExchangeResponse {
    /// State the exchange reports the order to be in.
    pub order_state: OrderState,
    /// Side the exchange echoes back.
    pub order_side: OrderSide,
    /// Exchange-side timestamp for this update.
    pub order_tmstmp: DateTime<Utc>,
    /// Effective price, present for fills and for market-order acknowledgements.
    pub price: Option<Decimal>,
    /// Exchange-assigned reference for this order.
    pub ext_order_ref: String,
    /// The client order id (`int_order_ref`) this response answers.
    pub client_order_id: String,
    /// Opaque payload kept only for logging.
    pub raw_data: serde_json::Value,
}

/// Order submission and cancellation against an exchange.
///
/// `client_order_id` (the engine's `int_order_ref`) is the exchange-facing
/// deduplication key: a retry with the same `client_order_id` must not
/// duplicate exchange-side state.
#[async_trait::async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Submit a new order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ExchangeTransport`] if the call itself fails.
    async fn create_order(
        &self,
        side: OrderSide,
        order_type: crate::domain::order_execution::value_objects::OrderType,
        base_asset: &str,
        quote_asset: &str,
        qty: &str,
        stop_price: Option<&str>,
        price: Option<&str>,
        client_order_id: &str,
    ) -> Result<ExchangeResponse, EngineError>;

    /// Cancel a previously-submitted order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ExchangeTransport`] if the call itself fails.
    async fn cancel_order(
        &self,
        base_asset: &str,
        quote_asset: &str,
        client_order_id: &str,
    ) -> Result<ExchangeResponse, EngineError>;
}
