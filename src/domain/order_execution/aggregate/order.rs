//! The Order aggregate.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::order_execution::value_objects::{OrderSide, OrderState, OrderType};
use crate::domain::shared::{OrderId, TradeId};

/// A single exchange order belonging to a trade.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    /// Monotonic id, assigned on first persist.
    pub order_id: Option<OrderId>,
    /// The trade this order belongs to.
    pub trade_id: TradeId,
    /// Buy or sell.
    pub order_side: OrderSide,
    /// Market, limit, stop-loss, or take-profit.
    pub order_type: OrderType,
    /// Order quantity, in base asset units.
    pub qty: Decimal,
    /// Limit price. `None` for `MARKET` orders until submission adopts one.
    pub price: Option<Decimal>,
    /// Stop trigger price, for stop-loss/take-profit order types.
    pub stop_price: Option<Decimal>,
    /// Current lifecycle state.
    pub order_state: OrderState,
    /// Stable client-generated reference: `PREFIX + order_id`.
    ///
    /// Assigned exactly once, on first persist, and never mutated afterwards.
    pub int_order_ref: Option<String>,
    /// Exchange-assigned reference, set once the exchange acknowledges.
    pub ext_order_ref: Option<String>,
    /// When this row was first created.
    pub init_tmstmp: DateTime<Utc>,
    /// When the order was first acknowledged `OPENED` (no-op on re-entry).
    pub open_tmstmp: Option<DateTime<Utc>>,
    /// When the order was first reported `FILLED`.
    pub filled_tmstmp: Option<DateTime<Utc>>,
    /// When this row was last updated.
    pub lst_upd_tmstmp: DateTime<Utc>,
}

impl Order {
    /// Build a new order in `OPEN_PENDING_INT`, not yet persisted (no id, no
    /// `int_order_ref`).
    #[must_use]
    pub fn new_pending(
        trade_id: TradeId,
        order_side: OrderSide,
        order_type: OrderType,
        qty: Decimal,
        price: Option<Decimal>,
        stop_price: Option<Decimal>,
        init_tmstmp: DateTime<Utc>,
    ) -> Self {
        Self {
            order_id: None,
            trade_id,
            order_side,
            order_type,
            qty,
            price,
            stop_price,
            order_state: OrderState::OpenPendingInt,
            int_order_ref: None,
            ext_order_ref: None,
            init_tmstmp,
            open_tmstmp: None,
            filled_tmstmp: None,
            lst_upd_tmstmp: init_tmstmp,
        }
    }

    /// Mark the order `OPENED` at `at`.
    ///
    /// Idempotent: re-entry leaves `open_tmstmp` untouched — the guard is on
    /// `open_tmstmp` itself, not `order_state`, since the caller may already
    /// have set `order_state` to `Opened` before calling this.
    pub fn mark_opened(&mut self, at: DateTime<Utc>) {
        if self.open_tmstmp.is_none() {
            self.open_tmstmp = Some(at);
        }
        self.order_state = OrderState::Opened;
        self.lst_upd_tmstmp = at;
    }

    /// Notional value of this order (`price * qty`), if it carries a price.
    #[must_use]
    pub fn notional(&self) -> Option<Decimal> {
        self.price.map(|p| p * self.qty)
    }
}
